use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::records::Domain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Platform Admin")]
    PlatformAdmin,
    #[serde(rename = "Company Admin")]
    CompanyAdmin,
    #[serde(rename = "CEO")]
    Ceo,
    #[serde(rename = "Finance Team")]
    FinanceTeam,
    #[serde(rename = "Operations Team")]
    OperationsTeam,
    #[serde(rename = "Sales & Marketing")]
    SalesMarketing,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::PlatformAdmin,
        Role::CompanyAdmin,
        Role::Ceo,
        Role::FinanceTeam,
        Role::OperationsTeam,
        Role::SalesMarketing,
    ];

    /// Accepts the display name (`"Sales & Marketing"`) or a kebab-case
    /// key (`sales-marketing`), case-insensitively.
    pub fn parse(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .replace('&', "")
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        match normalized.as_str() {
            "platform-admin" => Ok(Role::PlatformAdmin),
            "company-admin" | "admin" => Ok(Role::CompanyAdmin),
            "ceo" => Ok(Role::Ceo),
            "finance-team" | "finance" => Ok(Role::FinanceTeam),
            "operations-team" | "operations" => Ok(Role::OperationsTeam),
            "sales-marketing" | "sales" => Ok(Role::SalesMarketing),
            _ => Err(Error::UnknownRole(s.to_string())),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::PlatformAdmin => "Platform Admin",
            Role::CompanyAdmin => "Company Admin",
            Role::Ceo => "CEO",
            Role::FinanceTeam => "Finance Team",
            Role::OperationsTeam => "Operations Team",
            Role::SalesMarketing => "Sales & Marketing",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Role::PlatformAdmin => "platform-admin",
            Role::CompanyAdmin => "company-admin",
            Role::Ceo => "ceo",
            Role::FinanceTeam => "finance-team",
            Role::OperationsTeam => "operations-team",
            Role::SalesMarketing => "sales-marketing",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.display_name())
    }
}

/// A gated dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Domain(Domain),
    Platform,
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Page::Domain(d) => write!(f, "{d} dashboard"),
            Page::Platform => f.write_str("platform dashboard"),
        }
    }
}

/// Roles that may open a page for their own company.
pub fn allowed_roles(page: Page) -> &'static [Role] {
    match page {
        Page::Domain(Domain::Financial) | Page::Domain(Domain::Membership) => {
            &[Role::CompanyAdmin, Role::Ceo, Role::FinanceTeam]
        }
        Page::Domain(Domain::Operations) => &[Role::CompanyAdmin, Role::Ceo, Role::OperationsTeam],
        Page::Domain(Domain::SalesMarketing) => {
            &[Role::CompanyAdmin, Role::Ceo, Role::SalesMarketing]
        }
        Page::Platform => &[Role::PlatformAdmin],
    }
}

/// Decide whether a viewer may see `page` for `target_company`.
///
/// Platform admins may see every page of every company. Everyone else is
/// limited to their own company and to the pages their role unlocks.
pub fn check_access(
    role: Role,
    viewer_company: &str,
    target_company: &str,
    page: Page,
) -> Result<()> {
    let permitted = match role {
        Role::PlatformAdmin => true,
        _ => viewer_company == target_company && allowed_roles(page).contains(&role),
    };

    if permitted {
        Ok(())
    } else {
        log::debug!("denied {role} from {viewer_company} access to {page} of {target_company}");
        Err(Error::AccessDenied {
            role: role.to_string(),
            page: page.to_string(),
            company_id: target_company.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_accepts_display_and_keys() {
        assert_eq!(Role::parse("Sales & Marketing").unwrap(), Role::SalesMarketing);
        assert_eq!(Role::parse("sales-marketing").unwrap(), Role::SalesMarketing);
        assert_eq!(Role::parse("Company Admin").unwrap(), Role::CompanyAdmin);
        assert_eq!(Role::parse("CEO").unwrap(), Role::Ceo);
        assert_eq!(Role::parse("operations_team").unwrap(), Role::OperationsTeam);
        assert!(Role::parse("intern").is_err());
        for role in Role::ALL {
            assert_eq!(Role::parse(role.display_name()).unwrap(), role);
            assert_eq!(Role::parse(role.key()).unwrap(), role);
        }
    }

    #[test]
    fn test_page_role_table() {
        let ops = Page::Domain(Domain::Operations);
        assert!(check_access(Role::OperationsTeam, "acme", "acme", ops).is_ok());
        assert!(check_access(Role::FinanceTeam, "acme", "acme", ops).is_err());

        let sales = Page::Domain(Domain::SalesMarketing);
        assert!(check_access(Role::SalesMarketing, "acme", "acme", sales).is_ok());
        assert!(check_access(Role::OperationsTeam, "acme", "acme", sales).is_err());

        let membership = Page::Domain(Domain::Membership);
        assert!(check_access(Role::FinanceTeam, "acme", "acme", membership).is_ok());
        assert!(check_access(Role::SalesMarketing, "acme", "acme", membership).is_err());

        let finance = Page::Domain(Domain::Financial);
        assert!(check_access(Role::FinanceTeam, "acme", "acme", finance).is_ok());
        assert!(check_access(Role::OperationsTeam, "acme", "acme", finance).is_err());
    }

    #[test]
    fn test_admins_and_ceo_see_every_domain() {
        for domain in Domain::ALL {
            for role in [Role::CompanyAdmin, Role::Ceo] {
                assert!(check_access(role, "acme", "acme", Page::Domain(domain)).is_ok());
            }
        }
    }

    #[test]
    fn test_cross_company_is_denied() {
        let err = check_access(Role::Ceo, "acme", "globex", Page::Domain(Domain::Financial))
            .unwrap_err();
        match err {
            Error::AccessDenied { company_id, .. } => assert_eq!(company_id, "globex"),
            other => panic!("expected AccessDenied, got {other:?}"),
        }
    }

    #[test]
    fn test_platform_admin_reach() {
        assert!(check_access(Role::PlatformAdmin, "platform", "platform", Page::Platform).is_ok());
        assert!(check_access(
            Role::PlatformAdmin,
            "platform",
            "acme",
            Page::Domain(Domain::Operations)
        )
        .is_ok());
        assert!(check_access(Role::CompanyAdmin, "acme", "acme", Page::Platform).is_err());
    }
}

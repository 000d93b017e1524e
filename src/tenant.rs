use serde::{Deserialize, Serialize};

use crate::access::Role;
use crate::error::{Error, Result};

/// Company id reserved for platform administrators. It is not a tenant.
pub const PLATFORM_COMPANY_ID: &str = "platform";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Paid,
}

impl Plan {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Plan::Free),
            "paid" => Ok(Plan::Paid),
            other => Err(Error::Other(format!("unknown plan: {other}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Paid => "paid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub plan: Plan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub company_id: String,
}

/// Who is asking to see a dashboard. Passed explicitly to every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub role: Role,
    pub company_id: String,
}

impl Viewer {
    pub fn new(role: Role, company_id: impl Into<String>) -> Self {
        Self {
            role,
            company_id: company_id.into(),
        }
    }
}

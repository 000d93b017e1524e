use std::collections::{BTreeMap, BTreeSet};

use crate::metrics::{PlatformSummary, SubscriptionCounts};
use crate::tenant::{Company, Plan, User, PLATFORM_COMPANY_ID};

/// Cross-tenant counts for the platform admin overview.
///
/// Tenants are every company in `companies` plus any company a user
/// belongs to; the reserved platform company is never counted. A tenant
/// with no company row is treated as being on the free plan.
pub fn compute_platform_stats(companies: &[Company], users: &[User]) -> PlatformSummary {
    let plans: BTreeMap<&str, Plan> = companies
        .iter()
        .filter(|c| c.id != PLATFORM_COMPANY_ID)
        .map(|c| (c.id.as_str(), c.plan))
        .collect();

    let tenants: BTreeSet<&str> = plans
        .keys()
        .copied()
        .chain(
            users
                .iter()
                .map(|u| u.company_id.as_str())
                .filter(|id| *id != PLATFORM_COMPANY_ID),
        )
        .collect();

    let total_users = users
        .iter()
        .filter(|u| u.company_id != PLATFORM_COMPANY_ID)
        .count() as u64;

    let mut subscriptions = SubscriptionCounts::default();
    for id in &tenants {
        match plans.get(id).copied().unwrap_or(Plan::Free) {
            Plan::Free => subscriptions.free += 1,
            Plan::Paid => subscriptions.paid += 1,
        }
    }

    PlatformSummary {
        total_companies: tenants.len() as u64,
        total_users,
        active_subscriptions: subscriptions.free + subscriptions.paid,
        subscriptions,
    }
}

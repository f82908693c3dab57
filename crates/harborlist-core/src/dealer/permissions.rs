//! Dealer sub-account permissions.
//!
//! A flat rule table maps each role to its permissions. Sub-accounts may
//! carry per-permission overrides on top of their role; revokes beat grants,
//! and owner-only permissions can never be granted by override.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::error::HarborError;
use crate::types::*;
use crate::HarborResult;

// ---------------------------------------------------------------------------
// Roles and permissions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealerRole {
    /// The parent dealer account.
    Owner,
    Manager,
    SalesAgent,
    Viewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealerPermission {
    ViewListings,
    CreateListings,
    EditListings,
    DeleteListings,
    ViewLeads,
    RespondToLeads,
    ViewAnalytics,
    ManageSubAccounts,
    ManageBilling,
}

impl DealerPermission {
    pub const ALL: [DealerPermission; 9] = [
        DealerPermission::ViewListings,
        DealerPermission::CreateListings,
        DealerPermission::EditListings,
        DealerPermission::DeleteListings,
        DealerPermission::ViewLeads,
        DealerPermission::RespondToLeads,
        DealerPermission::ViewAnalytics,
        DealerPermission::ManageSubAccounts,
        DealerPermission::ManageBilling,
    ];

    /// Permissions reserved for the parent dealer account.
    pub fn is_owner_only(self) -> bool {
        matches!(
            self,
            DealerPermission::ManageSubAccounts | DealerPermission::ManageBilling
        )
    }

    fn as_str(self) -> &'static str {
        match self {
            DealerPermission::ViewListings => "view_listings",
            DealerPermission::CreateListings => "create_listings",
            DealerPermission::EditListings => "edit_listings",
            DealerPermission::DeleteListings => "delete_listings",
            DealerPermission::ViewLeads => "view_leads",
            DealerPermission::RespondToLeads => "respond_to_leads",
            DealerPermission::ViewAnalytics => "view_analytics",
            DealerPermission::ManageSubAccounts => "manage_sub_accounts",
            DealerPermission::ManageBilling => "manage_billing",
        }
    }
}

impl DealerRole {
    fn as_str(self) -> &'static str {
        match self {
            DealerRole::Owner => "owner",
            DealerRole::Manager => "manager",
            DealerRole::SalesAgent => "sales_agent",
            DealerRole::Viewer => "viewer",
        }
    }
}

impl fmt::Display for DealerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DealerPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealerRole {
    type Err = HarborError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        [
            DealerRole::Owner,
            DealerRole::Manager,
            DealerRole::SalesAgent,
            DealerRole::Viewer,
        ]
        .into_iter()
        .find(|r| r.as_str() == key)
        .ok_or_else(|| HarborError::InvalidInput {
            field: "role".into(),
            reason: format!("Unknown dealer role '{s}'"),
        })
    }
}

impl FromStr for DealerPermission {
    type Err = HarborError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        DealerPermission::ALL
            .into_iter()
            .find(|p| p.as_str() == key)
            .ok_or_else(|| HarborError::InvalidInput {
                field: "permission".into(),
                reason: format!("Unknown dealer permission '{s}'"),
            })
    }
}

/// Fixed permission set for a role.
pub fn role_permissions(role: DealerRole) -> BTreeSet<DealerPermission> {
    use DealerPermission::*;
    let granted: &[DealerPermission] = match role {
        DealerRole::Owner => &DealerPermission::ALL,
        DealerRole::Manager => &[
            ViewListings,
            CreateListings,
            EditListings,
            DeleteListings,
            ViewLeads,
            RespondToLeads,
            ViewAnalytics,
        ],
        DealerRole::SalesAgent => &[
            ViewListings,
            CreateListings,
            EditListings,
            ViewLeads,
            RespondToLeads,
        ],
        DealerRole::Viewer => &[ViewListings, ViewLeads],
    };
    granted.iter().copied().collect()
}

pub fn has_permission(role: DealerRole, permission: DealerPermission) -> bool {
    role_permissions(role).contains(&permission)
}

// ---------------------------------------------------------------------------
// Sub-accounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideEffect {
    Grant,
    Revoke,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverride {
    pub permission: DealerPermission,
    pub effect: OverrideEffect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubAccount {
    pub id: String,
    pub parent_dealer_id: String,
    pub role: DealerRole,
    #[serde(default)]
    pub overrides: Vec<PermissionOverride>,
}

/// Reject sub-accounts that could never be saved by the dealer portal.
pub fn validate_sub_account(account: &SubAccount) -> HarborResult<()> {
    if account.id.trim().is_empty() {
        return Err(HarborError::InvalidInput {
            field: "id".into(),
            reason: "Sub-account id cannot be blank".into(),
        });
    }
    if account.parent_dealer_id.trim().is_empty() {
        return Err(HarborError::InvalidInput {
            field: "parent_dealer_id".into(),
            reason: "Sub-account must belong to a dealer".into(),
        });
    }
    if account.role == DealerRole::Owner {
        return Err(HarborError::InvalidInput {
            field: "role".into(),
            reason: "Sub-accounts cannot hold the owner role".into(),
        });
    }
    if let Some(o) = account
        .overrides
        .iter()
        .find(|o| o.effect == OverrideEffect::Grant && o.permission.is_owner_only())
    {
        return Err(HarborError::InvalidInput {
            field: "overrides".into(),
            reason: format!("'{}' is reserved for the dealer owner", o.permission),
        });
    }
    Ok(())
}

/// Role permissions with overrides applied: grants first, then revokes.
pub fn effective_permissions(account: &SubAccount) -> BTreeSet<DealerPermission> {
    let mut permissions = role_permissions(account.role);
    for o in &account.overrides {
        if o.effect == OverrideEffect::Grant && !o.permission.is_owner_only() {
            permissions.insert(o.permission);
        }
    }
    for o in &account.overrides {
        if o.effect == OverrideEffect::Revoke {
            permissions.remove(&o.permission);
        }
    }
    permissions
}

/// Fail with [`HarborError::PermissionDenied`] unless the sub-account holds `permission`.
pub fn require_permission(account: &SubAccount, permission: DealerPermission) -> HarborResult<()> {
    if effective_permissions(account).contains(&permission) {
        Ok(())
    } else {
        Err(HarborError::PermissionDenied {
            role: account.role.to_string(),
            permission: permission.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Access check
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessCheckInput {
    pub sub_account: SubAccount,
    pub permission: DealerPermission,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessDecision {
    pub sub_account_id: String,
    pub role: DealerRole,
    pub permission: DealerPermission,
    pub allowed: bool,
    pub reason: String,
    pub effective_permissions: Vec<DealerPermission>,
}

pub fn check_access(input: &AccessCheckInput) -> HarborResult<ComputationOutput<AccessDecision>> {
    let start = Instant::now();
    let account = &input.sub_account;
    let permission = input.permission;
    let mut warnings: Vec<String> = Vec::new();

    if account.role == DealerRole::Owner {
        warnings.push("Owner role checked as a sub-account".into());
    }
    for o in &account.overrides {
        if o.effect == OverrideEffect::Grant && o.permission.is_owner_only() {
            warnings.push(format!(
                "Ignored grant of owner-only permission '{}'",
                o.permission
            ));
        }
    }

    let effective = effective_permissions(account);
    let allowed = effective.contains(&permission);
    let by_role = has_permission(account.role, permission);
    let override_for = |effect: OverrideEffect| {
        account
            .overrides
            .iter()
            .any(|o| o.permission == permission && o.effect == effect)
    };

    let reason = if allowed && by_role {
        format!("Granted by role '{}'", account.role)
    } else if allowed {
        "Granted by override".to_string()
    } else if override_for(OverrideEffect::Revoke) {
        "Revoked by override".to_string()
    } else if permission.is_owner_only() {
        "Reserved for the dealer owner".to_string()
    } else {
        format!("Not granted to role '{}'", account.role)
    };

    let output = AccessDecision {
        sub_account_id: account.id.clone(),
        role: account.role,
        permission,
        allowed,
        reason,
        effective_permissions: effective.into_iter().collect(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Dealer sub-account permission lookup",
        &serde_json::json!({
            "parent_dealer_id": account.parent_dealer_id,
            "overrides": account.overrides.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> SubAccount {
        SubAccount {
            id: "sub-1".into(),
            parent_dealer_id: "dealer-1".into(),
            role: DealerRole::SalesAgent,
            overrides: vec![],
        }
    }

    #[test]
    fn test_owner_holds_everything() {
        assert_eq!(role_permissions(DealerRole::Owner).len(), DealerPermission::ALL.len());
    }

    #[test]
    fn test_roles_never_hold_owner_only() {
        for role in [DealerRole::Manager, DealerRole::SalesAgent, DealerRole::Viewer] {
            assert!(role_permissions(role).iter().all(|p| !p.is_owner_only()));
        }
    }

    #[test]
    fn test_sales_agent_cannot_delete() {
        assert!(has_permission(DealerRole::SalesAgent, DealerPermission::EditListings));
        assert!(!has_permission(DealerRole::SalesAgent, DealerPermission::DeleteListings));
    }

    #[test]
    fn test_revoke_beats_grant() {
        let mut account = agent();
        account.overrides = vec![
            PermissionOverride {
                permission: DealerPermission::ViewAnalytics,
                effect: OverrideEffect::Grant,
            },
            PermissionOverride {
                permission: DealerPermission::ViewAnalytics,
                effect: OverrideEffect::Revoke,
            },
        ];
        assert!(!effective_permissions(&account).contains(&DealerPermission::ViewAnalytics));
    }

    #[test]
    fn test_owner_only_grant_ignored() {
        let mut account = agent();
        account.overrides = vec![PermissionOverride {
            permission: DealerPermission::ManageBilling,
            effect: OverrideEffect::Grant,
        }];
        assert!(!effective_permissions(&account).contains(&DealerPermission::ManageBilling));
        assert!(validate_sub_account(&account).is_err());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("sales-agent".parse::<DealerRole>().unwrap(), DealerRole::SalesAgent);
        assert_eq!(
            "Respond_To_Leads".parse::<DealerPermission>().unwrap(),
            DealerPermission::RespondToLeads
        );
        assert!("admiral".parse::<DealerRole>().is_err());
    }

    #[test]
    fn test_require_permission() {
        let account = agent();
        assert!(require_permission(&account, DealerPermission::ViewLeads).is_ok());
        let err = require_permission(&account, DealerPermission::ManageBilling).unwrap_err();
        assert!(matches!(err, HarborError::PermissionDenied { .. }));
    }
}

use clap::Args;
use serde_json::{json, Value};

use harborlist_core::dealer::permissions::{
    self, AccessCheckInput, DealerPermission, DealerRole, SubAccount,
};

use crate::input;

/// Arguments for dealer permission lookups
#[derive(Args)]
pub struct PermissionsArgs {
    /// Path to a JSON or YAML access check (sub-account + permission)
    #[arg(long)]
    pub input: Option<String>,

    /// Role to look up (owner, manager, sales_agent, viewer)
    #[arg(long)]
    pub role: Option<DealerRole>,

    /// Single permission to check for the role
    #[arg(long)]
    pub permission: Option<DealerPermission>,
}

pub fn run_permissions(args: PermissionsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(check) = input::load::<AccessCheckInput>(args.input.as_deref())? {
        permissions::validate_sub_account(&check.sub_account)?;
        let result = permissions::check_access(&check)?;
        return Ok(serde_json::to_value(result)?);
    }

    let role = args
        .role
        .ok_or("--role is required (or provide --input)")?;

    match args.permission {
        Some(permission) => {
            // Role-only lookups are checked as an override-free sub-account
            let check = AccessCheckInput {
                sub_account: SubAccount {
                    id: format!("{role}-lookup"),
                    parent_dealer_id: "-".into(),
                    role,
                    overrides: vec![],
                },
                permission,
            };
            let result = permissions::check_access(&check)?;
            Ok(serde_json::to_value(result)?)
        }
        None => {
            let granted: Vec<String> = permissions::role_permissions(role)
                .into_iter()
                .map(|p| p.to_string())
                .collect();
            Ok(json!({ "result": { "role": role, "permissions": granted } }))
        }
    }
}

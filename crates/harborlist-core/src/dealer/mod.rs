//! Dealer accounts: the permission rules governing dealer sub-accounts.

pub mod permissions;

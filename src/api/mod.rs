//! API client module for the Flock backend

pub mod client;
mod giving;
mod groups;
mod me;
mod prayers;

use anyhow::Result;

/// List the user's chat groups
pub async fn list_groups() -> Result<()> {
    groups::list_groups().await
}

/// List the members of a group
pub async fn list_members(group_id: u64) -> Result<()> {
    groups::list_members(group_id).await
}

/// List the user's prayer requests
pub async fn list_my_prayers() -> Result<()> {
    prayers::list_my_prayers().await
}

/// Show the user's giving history
pub async fn giving_history() -> Result<()> {
    giving::giving_history().await
}

/// Show current user info
pub async fn whoami() -> Result<()> {
    me::whoami().await
}

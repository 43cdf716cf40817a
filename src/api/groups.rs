//! Chat group endpoints

use anyhow::{Context, Result};
use serde::Deserialize;

use super::client::ApiClient;
use crate::models::{Group, GroupMember};

#[derive(Debug, Deserialize)]
struct GroupsResponse {
    groups: Vec<Group>,
}

#[derive(Debug, Deserialize)]
struct MembersResponse {
    members: Vec<GroupMember>,
}

/// List the user's chat groups (prints to stdout).
pub async fn list_groups() -> Result<()> {
    let client = ApiClient::new()?;
    let groups = list_groups_data(&client).await?;

    println!("\nGroups:");
    println!("{:-<60}", "");

    if groups.is_empty() {
        println!("  (no groups found)");
        return Ok(());
    }

    for group in &groups {
        let members = group
            .member_count
            .map(|n| format!("{} members", n))
            .unwrap_or_else(|| "members unknown".to_string());
        println!("  [{:>4}] {:<28} {}", group.id, group.name, members);
        if let Some(desc) = &group.description {
            println!("         {}", desc);
        }
    }
    println!("\nCall a group with: flock-cli call <group-id>");

    Ok(())
}

/// List the user's chat groups and return structured data.
pub async fn list_groups_data(client: &ApiClient) -> Result<Vec<Group>> {
    tracing::debug!("Fetching chat groups...");
    let resp = client.get("/chat/groups").await?;
    let groups: GroupsResponse = resp
        .json()
        .await
        .context("Failed to parse groups response")?;
    Ok(groups.groups)
}

/// List the members of a group (prints to stdout).
pub async fn list_members(group_id: u64) -> Result<()> {
    let client = ApiClient::new()?;

    tracing::debug!("Fetching members of group {}...", group_id);
    let resp = client
        .get(&format!("/chat/groups/{}/members", group_id))
        .await?;
    let members: MembersResponse = resp
        .json()
        .await
        .context("Failed to parse members response")?;

    println!("\nMembers of group {}:", group_id);
    println!("{:-<60}", "");

    if members.members.is_empty() {
        println!("  (no members found)");
        return Ok(());
    }

    for member in &members.members {
        let role = member.role.as_deref().unwrap_or("member");
        println!("  [{:>4}] {:<28} {}", member.user_id, member.full_name, role);
    }

    Ok(())
}

//! Current user info

use anyhow::{Context, Result};

use super::client::ApiClient;

/// Display the authenticated user's profile.
pub async fn whoami() -> Result<()> {
    let client = ApiClient::new()?;
    let user = client
        .current_user()
        .context("No user record stored. Run 'flock-cli login'.")?;

    println!();
    println!("Name:   {}", user.full_name);
    println!("Email:  {}", user.email);
    println!("Role:   {}", user.role.as_str());
    println!("ID:     {}", user.id);
    if let Some(phone) = &user.phone_number {
        println!("Phone:  {}", phone);
    }
    if !user.departments.is_empty() {
        println!("Depts:  {}", user.departments.join(", "));
    }
    if let Some(since) = &user.created_at {
        println!("Since:  {}", since);
    }
    if !user.is_active {
        println!("Status: inactive");
    }

    Ok(())
}

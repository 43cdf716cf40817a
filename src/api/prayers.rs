//! Prayer request endpoints

use anyhow::Result;

use super::client::ApiClient;
use crate::models::PrayerRequest;

/// List the user's prayer requests (prints to stdout).
pub async fn list_my_prayers() -> Result<()> {
    let client = ApiClient::new()?;
    let prayers = list_my_prayers_data(&client).await?;

    println!("\nMy prayer requests:");
    println!("{:-<60}", "");

    if prayers.is_empty() {
        println!("  (none yet)");
        return Ok(());
    }

    for prayer in &prayers {
        let urgency = if prayer.is_urgent { " URGENT" } else { "" };
        println!(
            "  [{:>4}] {:<12} {:?}{}",
            prayer.id, prayer.category, prayer.status, urgency
        );
        println!("         {}", prayer.request_text);
        let date = prayer.created_at.as_deref().unwrap_or("");
        println!("         -- {} {}", prayer.name, date);
    }

    Ok(())
}

/// The user's prayer requests.
///
/// The backend does not serve prayer data yet; this returns an empty
/// list so the view renders.
// TODO: switch to GET /prayers/mine once the backend ships the endpoint.
pub async fn list_my_prayers_data(_client: &ApiClient) -> Result<Vec<PrayerRequest>> {
    Ok(Vec::new())
}

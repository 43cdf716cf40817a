//! Giving history endpoints

use anyhow::Result;

use super::client::ApiClient;
use crate::models::Donation;

/// Show the user's giving history (prints to stdout).
pub async fn giving_history() -> Result<()> {
    let client = ApiClient::new()?;
    let donations = giving_history_data(&client).await?;

    println!("\nGiving history:");
    println!("{:-<60}", "");

    if donations.is_empty() {
        println!("  (no giving recorded)");
        return Ok(());
    }

    let mut total = 0.0;
    for donation in &donations {
        let method = donation.payment_method.as_deref().unwrap_or("-");
        let date = donation.created_at.as_deref().unwrap_or("-");
        let anon = if donation.is_anonymous {
            " (anonymous)"
        } else {
            ""
        };
        println!(
            "  [{:>4}] {:>10.2}  {:<16} {:<8} {}{}",
            donation.id, donation.amount, donation.purpose, method, date, anon
        );
        total += donation.amount;
    }
    println!("{:-<60}", "");
    println!("  Total: {:.2}", total);

    Ok(())
}

/// The user's recorded donations.
///
/// The backend does not serve donation data yet; this returns an empty
/// list so the view renders.
// TODO: switch to GET /donations/mine once the backend ships the endpoint.
pub async fn giving_history_data(_client: &ApiClient) -> Result<Vec<Donation>> {
    Ok(Vec::new())
}

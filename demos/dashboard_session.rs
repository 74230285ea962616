//! Dashboard session example
//!
//! Usage:
//!   DASHBOARD_API_BASE=http://localhost:8000 \
//!   DASHBOARD_EMAIL=admin@example.com DASHBOARD_PASSWORD=secret \
//!   cargo run --example dashboard_session

use dashboard_client::{ApiClient, ClientConfig, ListQuery, Route, WatchNavigator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ClientConfig::from_env()?;
    let email = std::env::var("DASHBOARD_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let password = std::env::var("DASHBOARD_PASSWORD").unwrap_or_default();

    println!("=== Dashboard Client Example ===");
    println!("Backend: {}", config.api_base);
    if let Some(path) = &config.session_path {
        println!("Session file: {}", path.display());
    }
    println!();

    let navigator = WatchNavigator::new();
    let client = ApiClient::connect(config, navigator.clone())?;

    // Reuse a stored session when there is one
    if let Some(redirect) = client.auth().guard(&Route::Login) {
        println!("Already signed in, landing page is {redirect}");
    } else {
        let user = client.auth().login(&email, &password).await?;
        println!(
            "Signed in as {} ({})",
            user.display_name().unwrap_or("unknown"),
            user.role.as_ref().map(|r| r.to_string()).unwrap_or_default()
        );
        if let Some(route) = navigator.current() {
            println!("Navigated to {route}");
        }
    }
    println!();

    match client.reports().dashboard().await {
        Ok(stats) => {
            println!("Revenue today:  {}", stats.total_pendapatan_hari_ini);
            println!("Revenue month:  {}", stats.total_pendapatan_bulan_ini);
            println!("Users:          {}", stats.total_user);
        }
        Err(e) if e.is_session_ended() => {
            println!("Session ended, back to {}", navigator.current().unwrap_or(Route::Login));
            return Ok(());
        }
        Err(e) => println!("! Could not load statistics: {e}"),
    }
    println!();

    let units = client.units().list(&ListQuery::default()).await?;
    println!("Units ({} total):", units.total);
    for unit in &units.data {
        println!("  - {} {}", unit.id, unit.name);
    }

    client.auth().token_store().flush_async().await?;
    Ok(())
}

mod config;
mod report;
mod status;

use std::io::{self, Write};

use anyhow::{Context, Result};
use config::Settings;
use core_lib::{AuthSession, Partner};
use gocardless::{GoCardlessConnect, Operations, DEFAULT_CURRENCY};
use tracing::info;
use tracing_subscriber::prelude::*;

fn setup_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "billing_flow=info,gocardless=info,core_lib=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

/// Prints `message` and reads one trimmed line from stdin.
fn prompt(message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush()?; // Force print before input

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stdin closed before an answer was given",
        ));
    }
    Ok(line.trim().to_string())
}

async fn run_flow(settings: Settings) -> Result<()> {
    println!("Step 1: Partner Authentication");
    let environment = settings.environment;
    let has_partner_token = settings.partner.is_some();
    info!(%environment, "starting billing request flow");

    let session = AuthSession::new(GoCardlessConnect::new(settings.oauth, environment));
    let mut partner = Partner::new(session, settings.partner);

    if !has_partner_token {
        partner
            .authenticate(|auth_url| {
                println!("Visit this URL to authorize the app: {}", auth_url);
                prompt("Please copy the URL you were redirected to: ")
            })
            .await
            .context("Partner authentication failed")?;

        println!("Authentication successful!");
        println!(
            "Access Token: {}",
            partner.session().access_token().unwrap_or_default()
        );
        println!(
            "Organisation ID: {}",
            partner.session().organisation_id().unwrap_or_default()
        );
    } else {
        println!("Proceeding");
    }

    let mut operations = Operations::connect(partner.session(), environment)?;

    println!("\nStep 2: Creating Billing Request Flow");
    let amount: i64 = prompt("Enter payment amount in pence (e.g., 1000 for £10.00): ")?
        .parse()
        .context("Payment amount must be a whole number of pence")?;
    let description = prompt("Enter payment description: ")?;

    let flow = operations
        .create_billing_request_and_flow(
            amount,
            DEFAULT_CURRENCY,
            Some(description.as_str()).filter(|d| !d.is_empty()),
        )
        .await
        .context("Failed to create billing request flow")?;

    println!("\nPlease share this URL with your customer to complete the payment:");
    println!("{}", flow.authorisation_url);

    let answer =
        prompt("\nWould you like to check the flow status and mandate details? (y/n): ")?;
    if answer.eq_ignore_ascii_case("y") {
        status::check_status(&mut io::stdout(), &mut operations).await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    setup_logging();

    let settings = Settings::from_env()?;
    run_flow(settings).await
}

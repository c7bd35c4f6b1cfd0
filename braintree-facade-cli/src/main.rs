//! Command-line front end for the Braintree facade.
//!
//! # Usage
//!
//! ```bash
//! # Generate a client token
//! braintree-facade client-token
//!
//! # Charge a nonce without submitting for settlement
//! braintree-facade sale --amount 10.00 --nonce fake-valid-nonce --no-settle
//!
//! # Configure logging level
//! RUST_LOG=debug braintree-facade plans
//! ```
//!
//! Results are printed to stdout as JSON. Exit code is `1` on any error and
//! `2` when the gateway reports an unsuccessful sale.
//!
//! # Environment Variables
//!
//! - `BRAINTREE_CONFIG`: path to the TOML configuration file (default: `braintree.toml`)
//! - `BRAINTREE_*`: override individual settings, see [`config`]
//! - `RUST_LOG`: log level filter (default: `info`)
//!
//! A `.env` file in the working directory is loaded first.

mod config;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use braintree_facade::{Amount, BraintreeFacade, ChargeOptions, Credentials, TransactionOptions};
use braintree_facade_http::HttpGatewayClient;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Exit code for a sale the gateway did not accept.
const EXIT_UNSUCCESSFUL: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "braintree-facade", version, about = "Braintree payment gateway facade")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, env = "BRAINTREE_CONFIG", default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the client token fetched at start-up.
    ClientToken,

    /// Charge a payment method nonce.
    Sale {
        /// Amount to charge, rounded to two decimal places.
        #[arg(long)]
        amount: Amount,
        /// Payment method nonce from the client SDK.
        #[arg(long)]
        nonce: String,
        /// Authorize only; do not submit for settlement.
        #[arg(long)]
        no_settle: bool,
        /// Do not store the payment method in the vault.
        #[arg(long)]
        no_vault: bool,
    },

    /// Charge on behalf of a sub-merchant and collect a service fee.
    SaleWithServiceFee {
        /// Sub-merchant account id.
        #[arg(long)]
        merchant_account_id: String,
        /// Amount to charge.
        #[arg(long)]
        amount: Amount,
        /// Fee kept by the master merchant.
        #[arg(long)]
        service_fee: Amount,
        /// Payment method nonce from the client SDK.
        #[arg(long)]
        nonce: Option<String>,
    },

    /// Look up a transaction.
    FindTransaction {
        /// Transaction id.
        id: String,
    },

    /// Look up a vault customer.
    FindCustomer {
        /// Customer id.
        id: String,
    },

    /// Look up a merchant account.
    FindMerchant {
        /// Merchant account id.
        id: String,
    },

    /// List every billing plan.
    Plans,

    /// List the id of every billing plan.
    PlanIds,

    /// Show one billing plan.
    Plan {
        /// Plan id.
        id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("braintree-facade failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let gateway_config = config::load_from(&cli.config)?;
    let credentials = Credentials::try_from(&gateway_config)?;
    tracing::info!(
        environment = %credentials.environment(),
        merchant_id = %credentials.merchant_id(),
        "Loaded configuration"
    );

    let mut client = HttpGatewayClient::new(credentials.clone())?;
    if let Some(base_url) = gateway_config.base_url.as_deref() {
        client = client.with_base_url(base_url)?;
    }
    if let Some(secs) = gateway_config.timeout_secs {
        client = client.with_timeout(Duration::from_secs(secs));
    }

    let facade = BraintreeFacade::initialize(credentials, client).await?;

    match cli.command {
        Command::ClientToken => print_json(facade.client_side_key())?,
        Command::Sale {
            amount,
            nonce,
            no_settle,
            no_vault,
        } => {
            let options = TransactionOptions::new()
                .with_amount(amount)
                .with_payment_method_nonce(nonce);
            let flags = ChargeOptions {
                submit_for_settlement: !no_settle,
                store_in_vault_on_success: !no_vault,
            };
            let outcome = facade.single_charge(&options, flags).await?;
            print_json(&outcome)?;
            if !outcome.status {
                tracing::warn!(message = ?outcome.result.message, "Sale was not successful");
                return Ok(ExitCode::from(EXIT_UNSUCCESSFUL));
            }
        }
        Command::SaleWithServiceFee {
            merchant_account_id,
            amount,
            service_fee,
            nonce,
        } => {
            let result = facade
                .sale_with_service_fee(&merchant_account_id, amount, nonce.as_deref(), service_fee)
                .await?;
            print_json(&result)?;
            if !result.success {
                tracing::warn!(message = ?result.message, "Sale was not successful");
                return Ok(ExitCode::from(EXIT_UNSUCCESSFUL));
            }
        }
        Command::FindTransaction { id } => print_json(&facade.find_transaction(&id).await?)?,
        Command::FindCustomer { id } => print_json(&facade.find_customer(&id).await?)?,
        Command::FindMerchant { id } => print_json(&facade.find_merchant(&id).await?)?,
        Command::Plans => print_json(&facade.get_all_plans().await?)?,
        Command::PlanIds => print_json(&facade.get_plan_ids().await?)?,
        Command::Plan { id } => {
            let plan = facade
                .get_plan_by_id(&id)
                .await?
                .ok_or_else(|| format!("no plan with id {id:?}"))?;
            print_json(&plan)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sale_flags() {
        let cli = Cli::try_parse_from([
            "braintree-facade",
            "--config",
            "custom.toml",
            "sale",
            "--amount",
            "19.999",
            "--nonce",
            "fake-valid-nonce",
            "--no-settle",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        let Command::Sale {
            amount,
            nonce,
            no_settle,
            no_vault,
        } = cli.command
        else {
            panic!("expected sale");
        };
        assert_eq!(amount.to_string(), "20.00");
        assert_eq!(nonce, "fake-valid-nonce");
        assert!(no_settle);
        assert!(!no_vault);
    }

    #[test]
    fn test_rejects_negative_amount() {
        let err = Cli::try_parse_from([
            "braintree-facade",
            "sale",
            "--amount",
            "-5",
            "--nonce",
            "n",
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn test_parse_plan_lookup() {
        let cli = Cli::try_parse_from(["braintree-facade", "plan", "gold"]).unwrap();
        assert!(matches!(cli.command, Command::Plan { id } if id == "gold"));
    }
}

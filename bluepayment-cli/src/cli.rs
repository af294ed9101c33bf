//! CLI definition for bluepayment.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use url::Url;

/// Operator tool for the Blue Media payment gateway.
#[derive(Parser, Debug)]
#[command(name = "bluepayment")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration (`[payment.bluepayment]` and optional `[http]`).
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Hash settings given on the command line.
///
/// Without `--algorithm` the configured `hash_algorithm` and
/// `hash_separator` are used.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// Message field as `name=value`; repeat in gateway order.
    #[arg(long = "field", short = 'f', value_parser = parse_field, required = true)]
    pub fields: Vec<(String, String)>,

    /// Shared key.
    #[arg(long, env = "BLUEPAYMENT_SHARED_KEY", hide_env_values = true)]
    pub secret: String,

    /// Hash algorithm name (`sha256`, `md5`, ...).
    #[arg(long)]
    pub algorithm: Option<String>,

    /// Separator placed between values.
    #[arg(long)]
    pub separator: Option<String>,
}

/// Commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the `Hash` of a message.
    Sign(HashArgs),
    /// Check the `Hash` of a received message. Exits with 1 on mismatch.
    Verify {
        /// Message fields and hash settings.
        #[command(flatten)]
        args: HashArgs,
        /// Hash received with the message.
        #[arg(long)]
        hash: String,
    },
    /// Fetch the payment channels enabled for the currency's service.
    GatewayList {
        /// Currency code (`PLN`, `EUR`, ...).
        #[arg(long)]
        currency: String,
        /// Store the channels in this catalog file for `gateway-name`.
        ///
        /// Records of other services already in the file are kept.
        #[arg(long)]
        save_catalog: Option<PathBuf>,
    },
    /// Fetch agreement texts for a gateway.
    Agreements {
        /// Gateway id.
        #[arg(long)]
        gateway_id: i64,
        /// Currency code.
        #[arg(long)]
        currency: String,
        /// Locale such as `pl_PL`.
        #[arg(long)]
        locale: String,
    },
    /// Fetch Google Pay merchant information for a store.
    MerchantInfo {
        /// Store base URL; its host is sent as `MerchantDomain`.
        #[arg(long)]
        store_url: Url,
        /// Currency code.
        #[arg(long)]
        currency: String,
    },
    /// Look up a gateway name in a stored catalog.
    GatewayName {
        /// Catalog file written by `gateway-list --save-catalog`.
        #[arg(long)]
        catalog: PathBuf,
        /// Service id of the payment.
        #[arg(long)]
        service_id: String,
        /// Gateway id of the payment.
        #[arg(long)]
        gateway_id: Option<i64>,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw.split_once('=').ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    if name.trim().is_empty() {
        return Err(format!("empty field name in '{raw}'"));
    }
    Ok((name.trim().to_owned(), value.to_owned()))
}

//! bluepayment CLI entry point.
//!
//! Every command prints pretty JSON on stdout. Negative results (hash
//! mismatch, gateway unavailable, unknown gateway) exit with status 1.

mod cli;
mod observability;

use std::{fs, path::Path, process::ExitCode};

use bluepayment_client::{
    GatewayError,
    catalog::{MemoryCatalog, find_gateway_name},
    client::{ApiClient, CallOutcome, ResponseFields},
    config::{ConfigProvider, MemoryConfig},
    hash::{CallbackVerifier, HASH_FIELD, MessageSigner, SignedFields},
    transport::{HttpConfig, HttpTransport},
};
use clap::Parser;
use cli::{Cli, Command, HashArgs};
use color_eyre::eyre::WrapErr;
use observability::{LogFormat, init_observability};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

/// Parts of the configuration file that are not gateway settings.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    http: HttpConfig,
}

#[tokio::main]
async fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_observability(LogFormat::from_env(), &cli.log_level);
    debug!("bluepayment v{}", env!("CARGO_PKG_VERSION"));

    let (source, http) = load_config(cli.config.as_deref())?;
    let config = ConfigProvider::new(source);

    match cli.command {
        Command::Sign(args) => {
            let signer = resolve_signer(&args, &config)?;
            let fields = collect_fields(&args);
            let hash = signer.sign(&fields, &args.secret);
            print_json(&json!({
                "algorithm": signer.algorithm().name(),
                "hash": hash,
                "fields": fields.with_hash(&signer, &args.secret),
            }))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify { args, hash } => {
            let verifier = CallbackVerifier::new(resolve_signer(&args, &config)?);
            let mut fields = collect_fields(&args);
            fields.insert(HASH_FIELD, hash);

            match verifier.verify_strict(fields, &args.secret) {
                Ok(_) => {
                    print_json(&json!({ "valid": true }))?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(GatewayError::Verification(reason)) => {
                    print_json(&json!({ "valid": false, "reason": reason }))?;
                    Ok(ExitCode::FAILURE)
                }
                Err(e) => Err(e.into()),
            }
        }
        Command::GatewayList { currency, save_catalog } => {
            let client = ApiClient::new(HttpTransport::with_config(&http)?, config);
            let credentials = client.config().credentials(&currency)?;
            info!(service_id = %credentials.service_id, currency = %currency, "Fetching gateway list");
            let outcome = client.gateway_list(&credentials.service_id, &credentials.shared_key, &currency).await?;

            if let (Some(path), CallOutcome::Success(fields)) = (&save_catalog, &outcome) {
                let stored = update_catalog(path, &credentials.service_id, fields)?;
                info!(path = %path.display(), stored, "Updated gateway catalog");
            }
            report_outcome(&outcome)
        }
        Command::Agreements { gateway_id, currency, locale } => {
            let client = ApiClient::new(HttpTransport::with_config(&http)?, config);
            let outcome = client.agreements(gateway_id, &currency, &locale).await?;
            report_outcome(&outcome)
        }
        Command::MerchantInfo { store_url, currency } => {
            let client = ApiClient::new(HttpTransport::with_config(&http)?, config);
            let outcome = client.google_pay_merchant_info(&store_url, &currency).await?;
            report_outcome(&outcome)
        }
        Command::GatewayName { catalog, service_id, gateway_id } => {
            let catalog = read_catalog(&catalog)?;
            let name = find_gateway_name(&catalog, &service_id, gateway_id);
            print_json(&json!({ "gateway_name": name }))?;
            Ok(if name.is_some() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

fn load_config(path: Option<&Path>) -> color_eyre::Result<(MemoryConfig, HttpConfig)> {
    let Some(path) = path else {
        return Ok((MemoryConfig::new(), HttpConfig::default()));
    };

    let raw = fs::read_to_string(path).wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    let source = MemoryConfig::from_toml(&raw)?;
    let file: FileConfig = toml::from_str(&raw).wrap_err("invalid [http] section")?;
    file.http.validate()?;

    debug!(path = %path.display(), entries = source.len(), "Loaded configuration");
    Ok((source, file.http))
}

/// Command-line hash settings win; otherwise the configured ones apply.
fn resolve_signer(args: &HashArgs, config: &ConfigProvider<MemoryConfig>) -> color_eyre::Result<MessageSigner> {
    let signer = match &args.algorithm {
        Some(algorithm) => MessageSigner::from_config(algorithm, args.separator.as_deref())?,
        None => {
            let configured = config.signer().wrap_err("pass --algorithm or set hash_algorithm in --config")?;
            match &args.separator {
                Some(separator) => MessageSigner::from_config(configured.algorithm().name(), Some(separator))?,
                None => configured,
            }
        }
    };
    Ok(signer)
}

fn collect_fields(args: &HashArgs) -> SignedFields {
    args.fields.iter().cloned().collect()
}

fn read_catalog(path: &Path) -> color_eyre::Result<MemoryCatalog> {
    let raw = fs::read_to_string(path).wrap_err_with(|| format!("failed to read catalog {}", path.display()))?;
    serde_json::from_str(&raw).wrap_err("catalog is not a JSON array of gateway records")
}

/// Merges a `gatewayList` response into the catalog file, creating it if needed.
fn update_catalog(path: &Path, service_id: &str, response: &ResponseFields) -> color_eyre::Result<usize> {
    let mut catalog = if path.exists() { read_catalog(path)? } else { MemoryCatalog::new() };
    let stored = catalog.ingest_gateway_list(service_id, response)?;
    fs::write(path, serde_json::to_string_pretty(&catalog)?)
        .wrap_err_with(|| format!("failed to write catalog {}", path.display()))?;
    Ok(stored)
}

fn report_outcome(outcome: &CallOutcome) -> color_eyre::Result<ExitCode> {
    print_json(outcome)?;
    Ok(if outcome.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> color_eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn hash_args(algorithm: Option<&str>, separator: Option<&str>) -> HashArgs {
        HashArgs {
            fields: vec![
                ("ServiceID".to_owned(), "123".to_owned()),
                ("MessageID".to_owned(), "abc".to_owned()),
                ("Currencies".to_owned(), "PLN".to_owned()),
            ],
            secret: "topsecret".to_owned(),
            algorithm: algorithm.map(str::to_owned),
            separator: separator.map(str::to_owned),
        }
    }

    #[test]
    fn test_resolve_signer_from_args() {
        let config = ConfigProvider::new(MemoryConfig::new());
        let signer = resolve_signer(&hash_args(Some("md5"), Some(";")), &config).unwrap();
        assert_eq!(signer.algorithm().name(), "md5");
        assert_eq!(signer.separator(), ";");
    }

    #[test]
    fn test_resolve_signer_from_config() {
        let config = ConfigProvider::new(
            MemoryConfig::new()
                .with("payment/bluepayment/hash_algorithm", "sha512")
                .with("payment/bluepayment/hash_separator", "#"),
        );

        let signer = resolve_signer(&hash_args(None, None), &config).unwrap();
        assert_eq!(signer.algorithm().name(), "sha512");
        assert_eq!(signer.separator(), "#");

        let signer = resolve_signer(&hash_args(None, Some("|")), &config).unwrap();
        assert_eq!(signer.separator(), "|");
    }

    #[test]
    fn test_resolve_signer_without_algorithm() {
        let config = ConfigProvider::new(MemoryConfig::new());
        assert!(resolve_signer(&hash_args(None, None), &config).is_err());
    }

    #[test]
    fn test_collect_fields_keeps_order() {
        let fields = collect_fields(&hash_args(None, None));
        let values: Vec<String> = fields.values().map(ToString::to_string).collect();
        assert_eq!(values, ["123", "abc", "PLN"]);
    }

    #[test]
    fn test_load_config_with_http_section() {
        let mut file = std::env::temp_dir();
        file.push(format!("bluepayment-cli-test-{}.toml", std::process::id()));
        let mut handle = fs::File::create(&file).unwrap();
        writeln!(
            handle,
            r#"
            [payment.bluepayment]
            hash_algorithm = "sha256"

            [http]
            timeout_secs = 12
            "#
        )
        .unwrap();

        let (source, http) = load_config(Some(&file)).unwrap();
        fs::remove_file(&file).unwrap();

        assert_eq!(http.timeout_secs, 12);
        let config = ConfigProvider::new(source);
        assert_eq!(config.get_value("hash_algorithm", None).as_deref(), Some("sha256"));
    }

    #[test]
    fn test_update_catalog_feeds_gateway_name() {
        let mut file = std::env::temp_dir();
        file.push(format!("bluepayment-cli-catalog-{}.json", std::process::id()));
        let _ = fs::remove_file(&file);

        let pln = json!({ "result": "OK", "gatewayList": [
            { "gatewayID": 106, "gatewayName": "PBL test", "bankName": "Test Bank" },
            { "gatewayID": 1500, "gatewayName": "BLIK" },
        ]});
        let eur = json!({ "gatewayList": [{ "gatewayID": 1500, "name": "BLIK EUR" }] });

        assert_eq!(update_catalog(&file, "100", pln.as_object().unwrap()).unwrap(), 2);
        assert_eq!(update_catalog(&file, "200", eur.as_object().unwrap()).unwrap(), 1);

        let catalog = read_catalog(&file).unwrap();
        fs::remove_file(&file).unwrap();

        assert_eq!(find_gateway_name(&catalog, "100", Some(1500)).as_deref(), Some("BLIK"));
        assert_eq!(find_gateway_name(&catalog, "200", Some(1500)).as_deref(), Some("BLIK EUR"));
        assert_eq!(find_gateway_name(&catalog, "200", Some(106)), None);
    }

    #[test]
    fn test_update_catalog_rejects_response_without_list() {
        let mut file = std::env::temp_dir();
        file.push(format!("bluepayment-cli-catalog-bad-{}.json", std::process::id()));
        let _ = fs::remove_file(&file);

        let response = json!({ "result": "ERROR" });
        assert!(update_catalog(&file, "100", response.as_object().unwrap()).is_err());
        assert!(!file.exists());
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config(Some(Path::new("/nonexistent/bluepayment.toml"))).is_err());
    }

    #[test]
    fn test_load_config_without_file() {
        let (source, http) = load_config(None).unwrap();
        assert!(source.is_empty());
        assert_eq!(http, HttpConfig::default());
    }
}

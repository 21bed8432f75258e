// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # IOST Wallet
//!
//! Entry point for the `iost` binary. Parses CLI arguments, loads the
//! config file, initializes logging and dispatches to one subcommand:
//!
//! - `keygen`    : generate and store a key pair
//! - `account-id`: derive the account id of a key
//! - `call`      : publish a single contract call
//! - `transfer`  : publish a `token.iost` transfer
//! - `receipt`   : fetch a receipt by transaction hash
//! - `tx`        : look up a transaction by hash
//! - `chain-info`: print the node's chain summary
//! - `version`   : print build version information

mod cli;
mod config;
mod keystore;
mod logging;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use serde_json::Value;

use iost_sdk::client::wire::TransactionJson;
use iost_sdk::client::{HttpClient, NodeApi, TxClient};
use iost_sdk::config::DEFAULT_PUBLISHER_PERMISSION;
use iost_sdk::crypto::{Algorithm, KeyPair};
use iost_sdk::identity::{derive_account_id, Account};
use iost_sdk::transaction::{ActionArg, AmountLimit, Transaction, TransactionBuilder};

use cli::{Commands, IostCli, KeyArgs, TxArgs};
use config::CliConfig;
use keystore::KeyStore;
use logging::LogFormat;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = IostCli::parse();
    logging::init_logging("iost=info,iost_sdk=info", LogFormat::from(cli.log_format));

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.node_url {
        config.node_url = url;
    }
    config.validate().context("invalid configuration")?;

    match cli.command {
        Commands::Keygen(args) => keygen(&config, &args.key, args.force),
        Commands::AccountId(args) => account_id(&config, &args.key, args.public_key.as_deref()),
        Commands::Call(args) => {
            let call_args = parse_call_args(&args.args)?;
            let mut tx = new_transaction(&config, &args.tx);
            tx.add_action(&args.contract, &args.action, call_args)?;
            if args.tx.amount_limits.is_empty() {
                tx.push_amount_limit(AmountLimit::default());
            }
            publish(&config, &args.tx, tx).await
        }
        Commands::Transfer(args) => {
            let mut tx = new_transaction(&config, &args.tx);
            tx.add_action(
                "token.iost",
                "transfer",
                [
                    args.token.as_str(),
                    args.tx.account.as_str(),
                    args.to.as_str(),
                    args.amount.as_str(),
                    args.memo.as_str(),
                ]
                .map(ActionArg::from),
            )?;
            if args.tx.amount_limits.is_empty() {
                tx.add_amount_limit(&args.token, &args.amount)?;
            }
            publish(&config, &args.tx, tx).await
        }
        Commands::Receipt(args) => {
            let client = HttpClient::new(config.node_url.as_str())?;
            let receipt = client.get_tx_receipt(&args.hash).await?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
            Ok(())
        }
        Commands::Tx(args) => {
            let client = HttpClient::new(config.node_url.as_str())?;
            let lookup = client.get_tx_by_hash(&args.hash).await?;
            println!("status: {}", lookup.status);
            println!(
                "{}",
                serde_json::to_string_pretty(&TransactionJson::from(&lookup.transaction))?
            );
            if let Some(receipt) = lookup.receipt {
                println!("{}", serde_json::to_string_pretty(&receipt)?);
            }
            Ok(())
        }
        Commands::ChainInfo => {
            let client = HttpClient::new(config.node_url.as_str())?;
            let info = client.get_chain_info().await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(())
        }
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Generates a key pair and writes it to the key directory.
fn keygen(config: &CliConfig, key: &KeyArgs, force: bool) -> Result<()> {
    let algorithm = parse_algorithm(&key.algorithm)?;
    let store = key_store(config, key);
    let keypair = KeyPair::generate(algorithm);
    let path = store.save(&key.nickname, &keypair, force)?;

    tracing::info!(key_path = %path.display(), algorithm = %algorithm, "key pair generated");

    println!("The IOST account id is:");
    println!("{}", keypair.id());
    println!("The keys have been saved in {}(.pub)", path.display());
    Ok(())
}

fn account_id(config: &CliConfig, key: &KeyArgs, public_key: Option<&str>) -> Result<()> {
    let id = match public_key {
        Some(encoded) => {
            let bytes = bs58::decode(encoded)
                .into_vec()
                .context("public key is not base58")?;
            derive_account_id(&bytes)
        }
        None => load_key(config, key)?.id().to_string(),
    };
    println!("{id}");
    Ok(())
}

/// Publishes `tx` as `--account` with the stored key, then waits for the
/// receipt unless `--no-wait` is set.
async fn publish(config: &CliConfig, args: &TxArgs, mut tx: Transaction) -> Result<()> {
    for raw in &args.amount_limits {
        let (token, bound) = parse_amount_limit(raw)?;
        tx.add_amount_limit(token, bound)?;
    }

    let mut account = Account::new(args.account.as_str());
    account.add_key_pair(DEFAULT_PUBLISHER_PERMISSION, load_key(config, &args.key)?);
    account.sign_publish(&mut tx)?;

    let client = TxClient::connect(config.node_url.as_str())
        .await
        .with_context(|| format!("failed to reach node at {}", config.node_url))?
        .with_poll_config(config.poll_config());

    let hash = client.send(&tx).await?;
    println!("Tx hash: {hash}");
    if args.no_wait {
        return Ok(());
    }

    let receipt = client.wait_for_receipt(&hash).await?;
    println!("{}", serde_json::to_string_pretty(&receipt)?);
    Ok(())
}

fn new_transaction(config: &CliConfig, args: &TxArgs) -> Transaction {
    TransactionBuilder::new()
        .chain_id(config.chain_id)
        .gas_ratio(args.gas_ratio.unwrap_or(config.gas_ratio))
        .gas_limit(args.gas_limit.unwrap_or(config.gas_limit))
        .expiration_secs(args.expiration.unwrap_or(config.expiration_secs))
        .build()
}

fn key_store(config: &CliConfig, key: &KeyArgs) -> KeyStore {
    KeyStore::new(key.key_dir.clone().unwrap_or_else(|| config.key_dir.clone()))
}

fn load_key(config: &CliConfig, key: &KeyArgs) -> Result<KeyPair> {
    let algorithm = parse_algorithm(&key.algorithm)?;
    key_store(config, key).load(&key.nickname, algorithm)
}

fn parse_algorithm(name: &str) -> Result<Algorithm> {
    name.parse::<Algorithm>()
        .with_context(|| format!("unknown algorithm {name:?}, expected ed25519 or secp256k1"))
}

/// Splits `token:bound`. The bound itself is validated by the SDK.
fn parse_amount_limit(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once(':') {
        Some((token, bound)) if !token.is_empty() && !bound.is_empty() => Ok((token, bound)),
        _ => bail!("amount limit must look like token:bound, got {raw:?}"),
    }
}

/// Parses a JSON array of scalar arguments.
fn parse_call_args(raw: &str) -> Result<Vec<ActionArg>> {
    let value: Value = serde_json::from_str(raw).context("call arguments are not valid JSON")?;
    let Value::Array(items) = value else {
        bail!("call arguments must be a JSON array");
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(ActionArg::Text(s)),
            Value::Number(n) => Ok(ActionArg::Number(n)),
            Value::Bool(b) => Ok(ActionArg::Bool(b)),
            other => Err(anyhow!(
                "unsupported call argument {other}: use strings, numbers or booleans"
            )),
        })
        .collect()
}

/// Prints version information to stdout.
fn print_version() {
    println!("iost      {}", env!("CARGO_PKG_VERSION"));
    println!("chain id  {}", iost_sdk::config::DEFAULT_CHAIN_ID);
    println!("rustc     {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_args_keep_scalar_types() {
        let args = parse_call_args(r#"["iost", 7, true, 1.5]"#).unwrap();
        assert_eq!(args.len(), 4);
        assert_eq!(args[0], ActionArg::from("iost"));
        assert_eq!(args[1], ActionArg::from(7i64));
        assert_eq!(args[2], ActionArg::Bool(true));
        assert!(matches!(args[3], ActionArg::Number(_)));
    }

    #[test]
    fn call_args_reject_nesting_and_non_arrays() {
        assert!(parse_call_args(r#"[["nested"]]"#).is_err());
        assert!(parse_call_args(r#"{"a": 1}"#).is_err());
        assert!(parse_call_args("not json").is_err());
        assert!(parse_call_args("[]").unwrap().is_empty());
    }

    #[test]
    fn amount_limit_flag() {
        assert_eq!(parse_amount_limit("iost:10.5").unwrap(), ("iost", "10.5"));
        assert_eq!(parse_amount_limit("*:unlimited").unwrap(), ("*", "unlimited"));
        assert!(parse_amount_limit("iost").is_err());
        assert!(parse_amount_limit(":10").is_err());
    }

    #[test]
    fn transaction_uses_config_and_overrides() {
        let config = CliConfig {
            gas_limit: 2_000.0,
            ..CliConfig::default()
        };
        let cli = IostCli::try_parse_from([
            "iost",
            "transfer",
            "bob",
            "1",
            "--account",
            "alice",
            "--gas-ratio",
            "2",
        ])
        .unwrap();
        let Commands::Transfer(args) = cli.command else {
            panic!("expected transfer");
        };

        let tx = new_transaction(&config, &args.tx);
        assert_eq!(tx.gas_ratio(), 2.0);
        assert_eq!(tx.gas_limit(), 2_000.0);
        assert_eq!(tx.chain_id(), config.chain_id);
        assert_eq!(
            tx.expiration() - tx.time(),
            config.expiration_secs * 1_000_000_000
        );
    }

    #[test]
    fn publishing_signs_with_stored_key() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig {
            key_dir: dir.path().to_path_buf(),
            ..CliConfig::default()
        };
        let keypair = KeyPair::generate(Algorithm::Ed25519);
        KeyStore::new(dir.path()).save("id", &keypair, false).unwrap();

        let key = KeyArgs {
            nickname: "id".to_string(),
            algorithm: "ed25519".to_string(),
            key_dir: None,
        };
        let mut account = Account::new("alice");
        account.add_key_pair(DEFAULT_PUBLISHER_PERMISSION, load_key(&config, &key).unwrap());

        let mut tx = TransactionBuilder::new().build();
        tx.add_action(
            "token.iost",
            "transfer",
            ["iost", "alice", "bob", "1", ""].map(ActionArg::from),
        )
        .unwrap();
        account.sign_publish(&mut tx).unwrap();

        assert_eq!(tx.publisher(), "alice");
        assert_eq!(tx.publisher_signatures()[0].public_key(), keypair.public_key());
        assert!(tx.verify_self().is_ok());
    }
}

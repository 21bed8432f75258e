//! # CLI Interface
//!
//! Defines the command-line argument structure for `iost` using `clap`
//! derive. Global options select the config file, the node and the log
//! format; each subcommand maps to one wallet operation.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// IOST command-line wallet.
///
/// Generates and stores key pairs, derives account ids, and builds, signs
/// and submits transactions to an IOST node over its HTTP gateway.
#[derive(Parser, Debug)]
#[command(
    name = "iost",
    about = "IOST command-line wallet",
    version,
    propagate_version = true
)]
pub struct IostCli {
    /// Path to the CLI configuration file (TOML).
    ///
    /// Built-in defaults apply when omitted.
    #[arg(long, short = 'c', env = "IOST_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// HTTP gateway of the node. Overrides `node_url` from the config file.
    #[arg(long, env = "IOST_NODE_URL", global = true)]
    pub node_url: Option<String>,

    /// Log output format.
    #[arg(long, value_enum, env = "IOST_LOG_FORMAT", default_value_t = LogFormatArg::Pretty, global = true)]
    pub log_format: LogFormatArg,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// `--log-format` values.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

/// Top-level subcommands for the `iost` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a key pair and save it to the key directory.
    Keygen(KeygenArgs),
    /// Print the account id of a stored key or a base58 public key.
    AccountId(AccountIdArgs),
    /// Call one contract action, published and paid for by `--account`.
    Call(CallArgs),
    /// Transfer tokens through `token.iost`.
    Transfer(TransferArgs),
    /// Fetch and print the receipt of a transaction.
    Receipt(HashArgs),
    /// Look up a transaction and its inclusion status.
    Tx(HashArgs),
    /// Print the node's chain summary.
    ChainInfo,
    /// Print version information and exit.
    Version,
}

/// Key file selection shared by every subcommand that reads a key.
#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    /// Nickname of the key file, `<key_dir>/<nickname>_<algorithm>`.
    #[arg(long, default_value = "id")]
    pub nickname: String,

    /// Signature algorithm: `ed25519` or `secp256k1`.
    #[arg(long, default_value = "ed25519")]
    pub algorithm: String,

    /// Key directory. Overrides `key_dir` from the config file.
    #[arg(long, env = "IOST_KEY_DIR")]
    pub key_dir: Option<PathBuf>,
}

/// Arguments for the `keygen` subcommand.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Replace an existing key file with the same name.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `account-id` subcommand.
#[derive(Args, Debug)]
pub struct AccountIdArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Base58 public key. Takes precedence over the key file.
    #[arg(long)]
    pub public_key: Option<String>,
}

/// Transaction options shared by `call` and `transfer`.
#[derive(Args, Debug, Clone)]
pub struct TxArgs {
    /// On-chain account name that publishes and pays for the transaction.
    #[arg(long)]
    pub account: String,

    #[command(flatten)]
    pub key: KeyArgs,

    /// Gas price multiplier. Overrides the config file.
    #[arg(long)]
    pub gas_ratio: Option<f64>,

    /// Gas limit. Overrides the config file.
    #[arg(long)]
    pub gas_limit: Option<f64>,

    /// Seconds until the transaction expires. Overrides the config file.
    #[arg(long)]
    pub expiration: Option<i64>,

    /// Amount limits as `token:bound`, e.g. `iost:100` or `*:unlimited`.
    #[arg(long = "amount-limit", value_name = "TOKEN:BOUND")]
    pub amount_limits: Vec<String>,

    /// Submit without waiting for the receipt.
    #[arg(long)]
    pub no_wait: bool,
}

/// Arguments for the `call` subcommand.
#[derive(Args, Debug)]
pub struct CallArgs {
    /// Contract id, e.g. `token.iost`.
    pub contract: String,

    /// Action (entry point) name.
    pub action: String,

    /// Arguments as a JSON array of strings, numbers and booleans.
    #[arg(default_value = "[]")]
    pub args: String,

    #[command(flatten)]
    pub tx: TxArgs,
}

/// Arguments for the `transfer` subcommand.
#[derive(Args, Debug)]
pub struct TransferArgs {
    /// Receiving account.
    pub to: String,

    /// Decimal amount, e.g. `10.5`.
    pub amount: String,

    /// Token symbol.
    #[arg(long, default_value = "iost")]
    pub token: String,

    /// Transfer memo.
    #[arg(long, default_value = "")]
    pub memo: String,

    #[command(flatten)]
    pub tx: TxArgs,
}

/// Arguments for the `receipt` and `tx` subcommands.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// Base58 transaction hash.
    pub hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        IostCli::command().debug_assert();
    }

    #[test]
    fn parses_transfer_with_globals() {
        let cli = IostCli::try_parse_from([
            "iost",
            "transfer",
            "bob",
            "10.5",
            "--account",
            "alice",
            "--amount-limit",
            "iost:10.5",
            "--node-url",
            "http://node:30001",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.node_url.as_deref(), Some("http://node:30001"));
        assert_eq!(cli.log_format, LogFormatArg::Json);
        match cli.command {
            Commands::Transfer(args) => {
                assert_eq!(args.to, "bob");
                assert_eq!(args.amount, "10.5");
                assert_eq!(args.token, "iost");
                assert_eq!(args.tx.account, "alice");
                assert_eq!(args.tx.amount_limits, vec!["iost:10.5".to_string()]);
                assert_eq!(args.tx.key.nickname, "id");
                assert!(!args.tx.no_wait);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn call_args_default_to_empty_array() {
        let cli =
            IostCli::try_parse_from(["iost", "call", "vote.iost", "vote", "--account", "alice"])
                .unwrap();
        match cli.command {
            Commands::Call(args) => {
                assert_eq!(args.contract, "vote.iost");
                assert_eq!(args.args, "[]");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn call_requires_account() {
        assert!(IostCli::try_parse_from(["iost", "call", "vote.iost", "vote"]).is_err());
    }
}

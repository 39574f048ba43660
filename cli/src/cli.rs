//! # CLI Interface
//!
//! Defines the command-line argument structure for `graphene-signer` using
//! `clap` derive. Subcommands: `derive-key`, `serialize`, `sign`, `verify`
//! and `version`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Offline serializer and signer for graphene transactions.
///
/// Transactions are read as node-style JSON. Signing requires the hex the
/// node returned from `get_transaction_hex` for the same transaction, so a
/// signature is only ever produced over bytes the node agrees with.
#[derive(Parser, Debug)]
#[command(
    name = "graphene-signer",
    about = "Serialize, cross-check and sign graphene transactions",
    version,
    propagate_version = true
)]
pub struct SignerCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Network whose chain id and address prefix to use.
    #[arg(long, global = true, value_enum, env = "GRAPHENE_NETWORK", default_value_t = Network::Mainnet)]
    pub network: Network,

    /// JSON signer config; overrides `--network` when given.
    #[arg(long, short = 'c', global = true, env = "GRAPHENE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Default log level when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Pretty)]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the public key and address for a WIF key.
    DeriveKey(KeyArgs),
    /// Print canonical hex, id and digest of an unsigned transaction.
    Serialize(TxArgs),
    /// Cross-check against a captured node reference, then sign.
    Sign(SignArgs),
    /// Report which signatures on a transaction recover to the given keys.
    Verify(VerifyArgs),
    /// Print version information and exit.
    Version,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Network {
    Mainnet,
    Testnet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

#[derive(Args, Debug)]
pub struct KeyArgs {
    /// WIF private key. Prefer the environment variable over the flag.
    #[arg(long, env = "GRAPHENE_WIF", hide_env_values = true)]
    pub wif: String,
}

#[derive(Args, Debug)]
pub struct TxArgs {
    /// Path to the transaction JSON.
    #[arg(long)]
    pub tx: PathBuf,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub tx: TxArgs,

    /// Hex returned by the node's `get_transaction_hex` for this transaction.
    #[arg(long)]
    pub reference_hex: String,

    #[command(flatten)]
    pub key: KeyArgs,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub tx: TxArgs,

    /// Expected signer addresses (e.g. `BTS6UUb...`). Repeatable.
    #[arg(long = "pubkey", required = true)]
    pub pubkeys: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        SignerCli::command().debug_assert();
    }

    #[test]
    fn sign_arguments_parse() {
        let cli = SignerCli::try_parse_from([
            "graphene-signer",
            "--network",
            "testnet",
            "sign",
            "--tx",
            "tx.json",
            "--reference-hex",
            "00",
            "--wif",
            "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ",
        ])
        .unwrap();
        assert_eq!(cli.global.network, Network::Testnet);
        match cli.command {
            Commands::Sign(args) => {
                assert_eq!(args.tx.tx, PathBuf::from("tx.json"));
                assert_eq!(args.reference_hex, "00");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn verify_requires_a_pubkey() {
        assert!(SignerCli::try_parse_from(["graphene-signer", "verify", "--tx", "t.json"]).is_err());
    }
}

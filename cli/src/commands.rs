//! Command handlers. Each returns the text to print so it can be tested
//! without capturing stdout.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use graphene_signing::config::{network_name, ChainParams, SignerConfig};
use graphene_signing::crypto::{PrefixedPublicKey, PrivateKey, PublicKey};
use graphene_signing::node::{NodeError, ReferenceSerializer};
use graphene_signing::transaction::{
    cross_check, sign_transaction, verify_transaction, SignatureStatus, Transaction,
};

use crate::cli::{GlobalArgs, KeyArgs, Network, SignArgs, TxArgs, VerifyArgs};

/// A `get_transaction_hex` reply captured earlier and passed on the command
/// line.
struct CapturedReference<'a>(&'a str);

impl ReferenceSerializer for CapturedReference<'_> {
    fn get_transaction_hex(&self, _tx: &serde_json::Value) -> Result<String, NodeError> {
        Ok(self.0.to_string())
    }
}

/// Resolve the signer config from `--config` or `--network`.
pub fn load_config(global: &GlobalArgs) -> Result<SignerConfig> {
    let config = match &global.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            SignerConfig::from_json(&raw)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => SignerConfig::for_chain(match global.network {
            Network::Mainnet => ChainParams::mainnet(),
            Network::Testnet => ChainParams::testnet(),
        }),
    };
    info!(network = %network_name(&config.chain.chain_id), "signer config loaded");
    Ok(config)
}

fn read_transaction(args: &TxArgs, config: &SignerConfig) -> Result<Transaction> {
    let raw = std::fs::read_to_string(&args.tx)
        .with_context(|| format!("failed to read transaction {}", args.tx.display()))?;
    let tx: Transaction = serde_json::from_str(&raw)
        .with_context(|| format!("invalid transaction JSON in {}", args.tx.display()))?;
    tx.validate(config.max_operations)
        .with_context(|| format!("transaction {} rejected", args.tx.display()))?;
    Ok(tx)
}

pub fn derive_key(args: &KeyArgs, config: &SignerConfig) -> Result<String> {
    let key = PrivateKey::from_wif(&args.wif).context("invalid WIF")?;
    let public = key.public_key();
    Ok(format!(
        "public key : {}\naddress    : {}\n",
        public.to_hex(),
        public.to_address(&config.chain.address_prefix)
    ))
}

pub fn serialize(args: &TxArgs, config: &SignerConfig) -> Result<String> {
    let tx = read_transaction(args, config)?;
    Ok(format!(
        "canonical : {}\nnode hex  : {}\nid        : {}\ndigest    : {}\n",
        hex::encode(tx.canonical_bytes()),
        tx.unsigned_hex(),
        tx.id(),
        hex::encode(tx.digest(&config.chain)),
    ))
}

pub fn sign(args: &SignArgs, config: &SignerConfig) -> Result<String> {
    let tx = read_transaction(&args.tx, config)?;
    let mut verified = cross_check(tx, &CapturedReference(&args.reference_hex))
        .context("reference hex does not match local serialization; refusing to sign")?;
    let signed = sign_transaction(&mut verified, &config.chain, &args.key.wif)
        .context("signing failed")?;
    let mut out = serde_json::to_string_pretty(&signed.to_json()?)?;
    out.push('\n');
    Ok(out)
}

pub fn verify(args: &VerifyArgs, config: &SignerConfig) -> Result<String> {
    let tx = read_transaction(&args.tx, config)?;
    let expected = args
        .pubkeys
        .iter()
        .map(|s| {
            s.parse::<PrefixedPublicKey>()
                .map(|k| k.key().clone())
                .with_context(|| format!("invalid public key {s}"))
        })
        .collect::<Result<Vec<PublicKey>>>()?;

    if tx.signatures.is_empty() {
        bail!("transaction carries no signatures");
    }

    let prefix = &config.chain.address_prefix;
    let checks = verify_transaction(&tx, &config.chain, &expected);
    let mut out = String::new();
    for check in &checks {
        let line = match &check.status {
            SignatureStatus::Valid { signer } => format!("valid ({})", signer.to_address(prefix)),
            SignatureStatus::UnexpectedSigner { recovered } => {
                format!("unexpected signer ({})", recovered.to_address(prefix))
            }
            SignatureStatus::NonCanonical => "non-canonical".to_string(),
            SignatureStatus::Unrecoverable(e) => format!("unrecoverable: {e}"),
        };
        writeln!(out, "signature {}: {line}", check.index)?;
    }

    let invalid = checks.iter().filter(|c| !c.is_valid()).count();
    if invalid > 0 {
        bail!("{out}{invalid} of {} signatures failed verification", checks.len());
    }
    Ok(out)
}

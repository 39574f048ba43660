//! Matching a signing key to an account.
//!
//! Before placing orders on an account's behalf, a client confirms that the
//! supplied WIF actually controls it: the derived public key is looked up
//! with `get_key_references`, and the account must be among the accounts
//! that reference it.

use tracing::{info, warn};

use super::KeyReferenceQuery;
use crate::chain::AccountId;
use crate::config::ChainParams;
use crate::crypto::{PrefixedPublicKey, PrivateKey, PublicKey};
use crate::transaction::TransactionError;

/// Check that `wif` is a key of `account`. Returns the key on success.
pub fn authenticate<N>(
    node: &N,
    chain: &ChainParams,
    wif: &str,
    account: AccountId,
) -> Result<PublicKey, TransactionError>
where
    N: KeyReferenceQuery + ?Sized,
{
    let public_key = PrivateKey::from_wif(wif)?.public_key();
    let prefixed = PrefixedPublicKey::new(chain.address_prefix.clone(), public_key.clone());
    let address = prefixed.to_string();

    let references = node.get_key_references(std::slice::from_ref(&prefixed))?;
    let accounts = references.first().map(Vec::as_slice).unwrap_or_default();

    if accounts.contains(&account) {
        info!(%account, %address, "key authenticated");
        Ok(public_key)
    } else {
        warn!(%account, %address, referenced = accounts.len(), "key does not control account");
        Err(TransactionError::NotAuthorized { account, address })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyError;
    use crate::node::NodeError;

    const WIF: &str = "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ";
    const ADDRESS: &str = "BTS6UUbAGbTLLWfY2gAc8XmjGBz2c7WT4fYB5r1L1aHDwAY88ujex";

    struct Refs(Vec<Vec<AccountId>>);

    impl KeyReferenceQuery for Refs {
        fn get_key_references(
            &self,
            keys: &[PrefixedPublicKey],
        ) -> Result<Vec<Vec<AccountId>>, NodeError> {
            assert_eq!(keys.len(), 1);
            assert_eq!(keys[0].to_string(), ADDRESS);
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_known_account_authenticates() {
        let node = Refs(vec![vec![AccountId::new(9), AccountId::new(100)]]);
        let key = authenticate(&node, &ChainParams::mainnet(), WIF, AccountId::new(100)).unwrap();
        assert_eq!(key.to_address("BTS"), ADDRESS);
    }

    #[test]
    fn test_other_account_is_rejected() {
        let node = Refs(vec![vec![AccountId::new(9)]]);
        let err = authenticate(&node, &ChainParams::mainnet(), WIF, AccountId::new(100)).unwrap_err();
        match err {
            TransactionError::NotAuthorized { account, address } => {
                assert_eq!(account, AccountId::new(100));
                assert_eq!(address, ADDRESS);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unreferenced_key_is_rejected() {
        let node = Refs(Vec::new());
        assert!(matches!(
            authenticate(&node, &ChainParams::mainnet(), WIF, AccountId::new(1)),
            Err(TransactionError::NotAuthorized { .. })
        ));
    }

    #[test]
    fn test_bad_wif_never_reaches_node() {
        struct Panics;
        impl KeyReferenceQuery for Panics {
            fn get_key_references(
                &self,
                _keys: &[PrefixedPublicKey],
            ) -> Result<Vec<Vec<AccountId>>, NodeError> {
                panic!("node must not be queried");
            }
        }
        assert!(matches!(
            authenticate(&Panics, &ChainParams::mainnet(), "5Hue", AccountId::new(1)),
            Err(TransactionError::Key(KeyError::InvalidLength { .. }))
                | Err(TransactionError::Key(KeyError::InvalidBase58(_)))
        ));
    }
}

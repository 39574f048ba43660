//! Fee schedules from `get_required_fees`.

use std::collections::BTreeMap;

use tracing::debug;

use super::{FeeScheduleQuery, NodeError};
use crate::chain::{AccountId, AssetAmount, AssetId};
use crate::operations::{Operation, OperationKind};

/// Required fee per operation kind, in a single asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSchedule {
    asset: AssetId,
    fees: BTreeMap<OperationKind, i64>,
}

impl FeeSchedule {
    /// Ask the node for the fees of `templates` and index them by kind.
    ///
    /// Fees depend on operation content (memo size, for instance), so the
    /// templates should resemble what will actually be sent.
    pub fn query<N>(node: &N, templates: &[Operation], asset: AssetId) -> Result<Self, NodeError>
    where
        N: FeeScheduleQuery + ?Sized,
    {
        let fees = node.get_required_fees(templates, asset)?;
        Self::from_required_fees(templates, &fees, asset)
    }

    /// Base fees of every supported kind for operations paid by `account`.
    pub fn for_account<N>(node: &N, account: AccountId, asset: AssetId) -> Result<Self, NodeError>
    where
        N: FeeScheduleQuery + ?Sized,
    {
        let kinds = OperationKind::ALL;
        let fees = node.get_account_fees(account, kinds, asset)?;
        debug!(account = %account, "account fees received");
        Self::from_kinds(kinds.iter().copied(), kinds.len(), &fees, asset)
    }

    /// Pair a `get_required_fees` reply with the operations that produced it.
    pub fn from_required_fees(
        templates: &[Operation],
        fees: &[AssetAmount],
        asset: AssetId,
    ) -> Result<Self, NodeError> {
        Self::from_kinds(templates.iter().map(Operation::kind), templates.len(), fees, asset)
    }

    fn from_kinds(
        kinds: impl Iterator<Item = OperationKind>,
        expected: usize,
        fees: &[AssetAmount],
        asset: AssetId,
    ) -> Result<Self, NodeError> {
        if expected != fees.len() {
            return Err(NodeError::Decode(format!(
                "expected {expected} fees, node returned {}",
                fees.len()
            )));
        }
        let mut map = BTreeMap::new();
        for (kind, fee) in kinds.zip(fees) {
            if fee.asset_id != asset {
                return Err(NodeError::Decode(format!(
                    "fee for {kind} quoted in {}, expected {asset}",
                    fee.asset_id
                )));
            }
            map.insert(kind, fee.amount);
        }
        debug!(asset = %asset, kinds = map.len(), "fee schedule loaded");
        Ok(Self { asset, fees: map })
    }

    pub fn asset(&self) -> AssetId {
        self.asset
    }

    pub fn get(&self, kind: OperationKind) -> Option<AssetAmount> {
        self.fees
            .get(&kind)
            .map(|amount| AssetAmount::new(*amount, self.asset))
    }

    pub fn get_by_name(&self, name: &str) -> Option<AssetAmount> {
        OperationKind::from_name(name).ok().and_then(|kind| self.get(kind))
    }

    /// `(operation name, amount)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, i64)> + '_ {
        self.fees.iter().map(|(kind, amount)| (kind.name(), *amount))
    }

    /// Overwrite the fee of every operation whose kind is known. Returns how
    /// many operations were left untouched.
    pub fn apply(&self, operations: &mut [Operation]) -> usize {
        let mut missing = 0;
        for op in operations.iter_mut() {
            match self.get(op.kind()) {
                Some(fee) => *op.fee_mut() = fee,
                None => missing += 1,
            }
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::{LimitOrderCancel, Transfer};

    /// Answers account fee queries with `100 * code` in `asset`.
    struct FlatFees {
        asset: AssetId,
        short_by: usize,
    }

    impl FeeScheduleQuery for FlatFees {
        fn get_required_fees(
            &self,
            operations: &[Operation],
            asset: AssetId,
        ) -> Result<Vec<AssetAmount>, NodeError> {
            Ok(operations.iter().map(|_| AssetAmount::new(1, asset)).collect())
        }

        fn get_account_fees(
            &self,
            account: AccountId,
            kinds: &[OperationKind],
            _asset: AssetId,
        ) -> Result<Vec<AssetAmount>, NodeError> {
            assert_eq!(account, AccountId::new(100));
            let keep = kinds.len() - self.short_by;
            Ok(kinds[..keep]
                .iter()
                .map(|kind| AssetAmount::new(100 * i64::from(kind.code()), self.asset))
                .collect())
        }
    }

    fn transfer() -> Operation {
        Transfer::new(
            AssetAmount::core(0),
            AccountId::new(1),
            AccountId::new(2),
            AssetAmount::core(1),
        )
        .into()
    }

    fn cancel() -> Operation {
        LimitOrderCancel {
            fee: AssetAmount::core(0),
            fee_paying_account: AccountId::new(1),
            order: "1.7.5".parse().unwrap(),
            extensions: Default::default(),
        }
        .into()
    }

    #[test]
    fn test_schedule_indexes_by_kind_and_applies() {
        let templates = [transfer(), cancel()];
        let schedule = FeeSchedule::from_required_fees(
            &templates,
            &[AssetAmount::core(86_869), AssetAmount::core(578)],
            AssetId::CORE,
        )
        .unwrap();
        assert_eq!(schedule.get_by_name("transfer"), Some(AssetAmount::core(86_869)));
        assert_eq!(
            schedule.iter().collect::<Vec<_>>(),
            vec![("transfer", 86_869), ("limit_order_cancel", 578)]
        );

        let mut ops = vec![transfer(), cancel(), transfer()];
        assert_eq!(schedule.apply(&mut ops), 0);
        assert_eq!(ops[2].fee(), &AssetAmount::core(86_869));
        assert_eq!(ops[1].fee(), &AssetAmount::core(578));
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        assert!(FeeSchedule::from_required_fees(&[transfer()], &[], AssetId::CORE).is_err());
    }

    #[test]
    fn test_wrong_asset_is_rejected() {
        let result = FeeSchedule::from_required_fees(
            &[transfer()],
            &[AssetAmount::new(5, AssetId::new(121))],
            AssetId::CORE,
        );
        assert!(matches!(result, Err(NodeError::Decode(_))));
    }

    #[test]
    fn test_unknown_kind_is_counted() {
        let schedule =
            FeeSchedule::from_required_fees(&[cancel()], &[AssetAmount::core(5)], AssetId::CORE)
                .unwrap();
        let mut ops = vec![transfer()];
        assert_eq!(schedule.apply(&mut ops), 1);
        assert_eq!(ops[0].fee(), &AssetAmount::core(0));
    }

    #[test]
    fn test_account_schedule_covers_every_kind() {
        let node = FlatFees {
            asset: AssetId::CORE,
            short_by: 0,
        };
        let schedule = FeeSchedule::for_account(&node, AccountId::new(100), AssetId::CORE).unwrap();
        assert_eq!(schedule.iter().count(), OperationKind::ALL.len());
        assert_eq!(schedule.get_by_name("transfer"), Some(AssetAmount::core(0)));
        assert_eq!(
            schedule.get(OperationKind::LiquidityPoolUpdate),
            Some(AssetAmount::core(7_500))
        );

        let mut ops = vec![cancel()];
        assert_eq!(schedule.apply(&mut ops), 0);
        assert_eq!(ops[0].fee(), &AssetAmount::core(200));
    }

    #[test]
    fn test_account_schedule_rejects_short_or_foreign_replies() {
        let short = FlatFees {
            asset: AssetId::CORE,
            short_by: 1,
        };
        assert!(matches!(
            FeeSchedule::for_account(&short, AccountId::new(100), AssetId::CORE),
            Err(NodeError::Decode(_))
        ));

        let foreign = FlatFees {
            asset: AssetId::new(121),
            short_by: 0,
        };
        assert!(matches!(
            FeeSchedule::for_account(&foreign, AccountId::new(100), AssetId::CORE),
            Err(NodeError::Decode(_))
        ));
    }
}

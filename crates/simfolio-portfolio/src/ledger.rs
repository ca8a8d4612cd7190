//! Portfolio ledger.
//!
//! The ledger owns the session's [`PortfolioRepository`] and is the only
//! writer. It validates inputs at the boundary, assigns opaque ids, and
//! recomputes allocation after every change to the asset collection, so the
//! stored allocation is never stale.

use simfolio_core::{Symbol, UtcDateTime};
use uuid::Uuid;

use crate::allocation::recalculate_allocation;
use crate::repository::PortfolioRepository;
use crate::{Asset, AssetKind, LedgerError, NewAsset, TradeRecord, TradeSide};

/// Authoritative in-memory store of assets and trade history.
pub struct Ledger {
    repository: PortfolioRepository,
}

impl Ledger {
    /// Wrap a repository. Allocation is recomputed once here so even a
    /// hand-assembled repository enters in a consistent state.
    pub fn new(mut repository: PortfolioRepository) -> Self {
        recalculate_allocation(repository.assets_mut());
        Self { repository }
    }

    /// Empty ledger.
    pub fn empty() -> Self {
        Self::new(PortfolioRepository::new())
    }

    /// Ledger over the demo starter book.
    pub fn seeded() -> Self {
        Self::new(PortfolioRepository::seeded())
    }

    /// Store a new holding.
    ///
    /// Assigns a fresh opaque id, appends the asset, recomputes allocation
    /// across the entire collection and returns the stored asset with its
    /// final allocation.
    ///
    /// # Errors
    ///
    /// [`LedgerError`] when the candidate value is negative or not finite.
    pub fn add_asset(&mut self, candidate: NewAsset) -> Result<Asset, LedgerError> {
        if !candidate.value.is_finite() {
            return Err(LedgerError::NonFiniteValue { field: "value" });
        }
        if candidate.value < 0.0 {
            return Err(LedgerError::NegativeAssetValue {
                value: candidate.value,
            });
        }

        self.repository.insert_asset(Asset {
            id: Uuid::new_v4().to_string(),
            name: candidate.name,
            value: candidate.value,
            kind: candidate.kind,
            allocation: 0.0,
        });
        recalculate_allocation(self.repository.assets_mut());

        Ok(self
            .repository
            .assets()
            .last()
            .cloned()
            .expect("the asset was appended above"))
    }

    /// Record a simulated trade.
    ///
    /// Computes `total = price * quantity`, stamps id and timestamp, and
    /// prepends the record to history. A Buy also books a new Stock holding
    /// named after the symbol and valued at `total`; a Sell has no
    /// asset-side effect.
    ///
    /// # Errors
    ///
    /// [`LedgerError`] when price is not a positive finite number or
    /// quantity is zero.
    pub fn add_trade(
        &mut self,
        symbol: Symbol,
        side: TradeSide,
        price: f64,
        quantity: u32,
    ) -> Result<TradeRecord, LedgerError> {
        if !price.is_finite() {
            return Err(LedgerError::NonFiniteValue { field: "price" });
        }
        if price <= 0.0 {
            return Err(LedgerError::NonPositivePrice { value: price });
        }
        if quantity == 0 {
            return Err(LedgerError::ZeroQuantity);
        }

        let total = price * f64::from(quantity);
        let ts = UtcDateTime::now();
        let trade = TradeRecord {
            id: Uuid::new_v4().to_string(),
            symbol: symbol.clone(),
            side,
            price,
            quantity,
            total,
            date_label: ts.datetime_label(),
            ts,
        };

        self.repository.record_trade(trade.clone());

        if side == TradeSide::Buy {
            self.add_asset(NewAsset::new(symbol.as_str(), total, AssetKind::Stock))?;
        }

        Ok(trade)
    }

    /// Snapshot copy of the asset collection; not a live view.
    pub fn assets(&self) -> Vec<Asset> {
        self.repository.asset_snapshot()
    }

    /// Snapshot copy of trade history, most-recent-first.
    pub fn trades(&self) -> Vec<TradeRecord> {
        self.repository.trade_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(input: &str) -> Symbol {
        Symbol::parse(input).expect("valid symbol")
    }

    #[test]
    fn add_asset_assigns_distinct_ids_and_recomputes_allocation() {
        let mut ledger = Ledger::empty();

        let first = ledger
            .add_asset(NewAsset::new("Cash", 600.0, AssetKind::Cash))
            .expect("valid asset");
        let second = ledger
            .add_asset(NewAsset::new("Gold", 400.0, AssetKind::Other))
            .expect("valid asset");

        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);
        assert_eq!(second.allocation, 40.0);

        let assets = ledger.assets();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].allocation, 60.0);
    }

    #[test]
    fn add_trade_computes_exact_total() {
        let mut ledger = Ledger::empty();

        let trade = ledger
            .add_trade(symbol("AAPL"), TradeSide::Buy, 150.0, 10)
            .expect("valid trade");

        assert_eq!(trade.total, 1_500.0);
        assert_eq!(trade.side, TradeSide::Buy);
    }

    #[test]
    fn buy_books_a_stock_holding_for_the_symbol() {
        let mut ledger = Ledger::empty();

        ledger
            .add_trade(symbol("TSLA"), TradeSide::Buy, 200.0, 5)
            .expect("valid trade");

        let assets = ledger.assets();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].name, "TSLA");
        assert_eq!(assets[0].value, 1_000.0);
        assert_eq!(assets[0].kind, AssetKind::Stock);
        assert_eq!(assets[0].allocation, 100.0);
    }

    #[test]
    fn sell_has_no_asset_side_effect() {
        let mut ledger = Ledger::empty();

        ledger
            .add_trade(symbol("TSLA"), TradeSide::Sell, 200.0, 5)
            .expect("valid trade");

        assert!(ledger.assets().is_empty());
        assert_eq!(ledger.trades().len(), 1);
    }

    #[test]
    fn trades_read_most_recent_first() {
        let mut ledger = Ledger::empty();

        ledger
            .add_trade(symbol("AAPL"), TradeSide::Buy, 150.0, 1)
            .expect("valid trade");
        ledger
            .add_trade(symbol("MSFT"), TradeSide::Sell, 300.0, 2)
            .expect("valid trade");

        let trades = ledger.trades();
        assert_eq!(trades[0].symbol.as_str(), "MSFT");
        assert_eq!(trades[1].symbol.as_str(), "AAPL");
    }

    #[test]
    fn rejects_non_positive_price() {
        let mut ledger = Ledger::empty();

        let err = ledger
            .add_trade(symbol("AAPL"), TradeSide::Buy, 0.0, 1)
            .expect_err("zero price must fail");
        assert!(matches!(err, LedgerError::NonPositivePrice { .. }));

        let err = ledger
            .add_trade(symbol("AAPL"), TradeSide::Buy, -5.0, 1)
            .expect_err("negative price must fail");
        assert!(matches!(err, LedgerError::NonPositivePrice { .. }));
    }

    #[test]
    fn rejects_zero_quantity() {
        let mut ledger = Ledger::empty();

        let err = ledger
            .add_trade(symbol("AAPL"), TradeSide::Buy, 150.0, 0)
            .expect_err("zero quantity must fail");
        assert!(matches!(err, LedgerError::ZeroQuantity));
    }

    #[test]
    fn rejects_negative_asset_value() {
        let mut ledger = Ledger::empty();

        let err = ledger
            .add_asset(NewAsset::new("Broken", -1.0, AssetKind::Other))
            .expect_err("negative value must fail");
        assert!(matches!(err, LedgerError::NegativeAssetValue { .. }));
    }

    #[test]
    fn snapshots_do_not_alias_live_state() {
        let mut ledger = Ledger::seeded();
        let before = ledger.assets();

        ledger
            .add_asset(NewAsset::new("New Fund", 100_000.0, AssetKind::Other))
            .expect("valid asset");

        assert_eq!(before.len() + 1, ledger.assets().len());
    }
}

//! In-memory portfolio storage.
//!
//! One repository instance is constructed per session and injected into the
//! [`crate::Ledger`]; tests get isolation by constructing a fresh one. The
//! repository only stores; validation, id assignment and allocation upkeep
//! are the ledger's job.

use simfolio_core::{Symbol, UtcDateTime};
use uuid::Uuid;

use crate::allocation::recalculate_allocation;
use crate::{Asset, AssetKind, TradeRecord, TradeSide};

/// Owned asset and trade storage for the current session.
///
/// Trades are kept most-recent-first; assets in insertion order.
#[derive(Debug, Clone, Default)]
pub struct PortfolioRepository {
    assets: Vec<Asset>,
    trades: Vec<TradeRecord>,
}

impl PortfolioRepository {
    /// Empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with the demo starter book: four holdings
    /// across asset kinds and one historical trade, allocation already
    /// consistent.
    pub fn seeded() -> Self {
        let mut assets = vec![
            seed_asset("TSMC Shares", 1_500_000.0, AssetKind::Stock),
            seed_asset("Cash Deposits", 800_000.0, AssetKind::Cash),
            seed_asset("Bitcoin", 500_000.0, AssetKind::Crypto),
            seed_asset("Bond ETF", 500_000.0, AssetKind::Other),
        ];
        recalculate_allocation(&mut assets);

        let ts = UtcDateTime::now();
        let trades = vec![TradeRecord {
            id: Uuid::new_v4().to_string(),
            symbol: Symbol::parse("AAPL").expect("seed symbol is valid"),
            side: TradeSide::Buy,
            price: 150.0,
            quantity: 10,
            total: 1_500.0,
            date_label: ts.datetime_label(),
            ts,
        }];

        Self { assets, trades }
    }

    pub fn insert_asset(&mut self, asset: Asset) {
        self.assets.push(asset);
    }

    /// Prepend a trade so history reads most-recent-first.
    pub fn record_trade(&mut self, trade: TradeRecord) {
        self.trades.insert(0, trade);
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut [Asset] {
        &mut self.assets
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn asset_snapshot(&self) -> Vec<Asset> {
        self.assets.clone()
    }

    pub fn trade_snapshot(&self) -> Vec<TradeRecord> {
        self.trades.clone()
    }
}

fn seed_asset(name: &str, value: f64, kind: AssetKind) -> Asset {
    Asset {
        id: Uuid::new_v4().to_string(),
        name: String::from(name),
        value,
        kind,
        allocation: 0.0,
    }
}

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use simfolio_core::{Symbol, UtcDateTime};

/// Broad asset category used for allocation reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetKind {
    Cash,
    Stock,
    Crypto,
    RealEstate,
    Other,
}

impl AssetKind {
    pub const ALL: [Self; 5] = [
        Self::Cash,
        Self::Stock,
        Self::Crypto,
        Self::RealEstate,
        Self::Other,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Stock => "STOCK",
            Self::Crypto => "CRYPTO",
            Self::RealEstate => "REAL_ESTATE",
            Self::Other => "OTHER",
        }
    }
}

impl Display for AssetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored holding.
///
/// `allocation` is always derived from `value` by the ledger; it is never an
/// input. The `id` is opaque and assigned on insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub kind: AssetKind,
    pub allocation: f64,
}

/// Candidate holding submitted to [`crate::Ledger::add_asset`]; carries no id
/// or allocation because the ledger assigns both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAsset {
    pub name: String,
    pub value: f64,
    pub kind: AssetKind,
}

impl NewAsset {
    pub fn new(name: impl Into<String>, value: f64, kind: AssetKind) -> Self {
        Self {
            name: name.into(),
            value,
            kind,
        }
    }
}

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl Display for TradeSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of one executed simulated trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: String,
    pub symbol: Symbol,
    pub side: TradeSide,
    pub price: f64,
    pub quantity: u32,
    pub total: f64,
    pub ts: UtcDateTime,
    pub date_label: String,
}

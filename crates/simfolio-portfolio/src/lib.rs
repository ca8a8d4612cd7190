//! # Simfolio Portfolio
//!
//! In-memory portfolio ledger for the simfolio tracker: asset holdings with
//! derived allocation, an append-only trade history, and boundary validation
//! of trade and asset inputs.
//!
//! The [`Ledger`] is the single writer over a [`PortfolioRepository`]
//! constructed once per session. Allocation percentages are recomputed after
//! every asset mutation; they are never set directly.

pub mod allocation;
pub mod error;
pub mod ledger;
pub mod models;
pub mod repository;

pub use allocation::recalculate_allocation;
pub use error::LedgerError;
pub use ledger::Ledger;
pub use models::{Asset, AssetKind, NewAsset, TradeRecord, TradeSide};
pub use repository::PortfolioRepository;

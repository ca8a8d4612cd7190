//! External price-data provider adapters.

mod finnhub;

pub use finnhub::FinnhubAdapter;

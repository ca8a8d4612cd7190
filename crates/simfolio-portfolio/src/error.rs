use thiserror::Error;

/// Input validation failures raised at the ledger boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LedgerError {
    #[error("trade price must be positive, got {value}")]
    NonPositivePrice { value: f64 },
    #[error("trade quantity must be greater than zero")]
    ZeroQuantity,
    #[error("asset value must be non-negative, got {value}")]
    NegativeAssetValue { value: f64 },
    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
}

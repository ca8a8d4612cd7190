use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Supported chart time ranges.
///
/// The range drives both the real-data request window and the length of a
/// simulated series, see [`TimeRange::candle_count`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1d")]
    Intraday,
    #[serde(rename = "1m")]
    Month,
    #[serde(rename = "1y")]
    Year,
}

impl TimeRange {
    pub const ALL: [Self; 3] = [Self::Intraday, Self::Month, Self::Year];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intraday => "1d",
            Self::Month => "1m",
            Self::Year => "1y",
        }
    }

    /// Number of candles a simulated series carries for this range.
    pub const fn candle_count(self) -> usize {
        match self {
            Self::Intraday => 24,
            Self::Month => 30,
            Self::Year => 100,
        }
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1d" => Ok(Self::Intraday),
            "1m" => Ok(Self::Month),
            "1y" => Ok(Self::Year),
            other => Err(ValidationError::InvalidTimeRange {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_range() {
        let range = TimeRange::from_str("1Y").expect("must parse");
        assert_eq!(range, TimeRange::Year);
    }

    #[test]
    fn rejects_unknown_range() {
        let err = TimeRange::from_str("6m").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidTimeRange { .. }));
    }

    #[test]
    fn count_policy_matches_range() {
        assert_eq!(TimeRange::Intraday.candle_count(), 24);
        assert_eq!(TimeRange::Month.candle_count(), 30);
        assert_eq!(TimeRange::Year.candle_count(), 100);
    }
}

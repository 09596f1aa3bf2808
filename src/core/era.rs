use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::PnrError;

/// Half-open range `[low, high)` of sequence numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceRange {
    pub low: u16,
    pub high: u16,
}

impl SequenceRange {
    pub const fn new(low: u16, high: u16) -> Self {
        Self { low, high }
    }

    pub fn len(&self) -> usize {
        self.high.saturating_sub(self.low) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, value: u16) -> bool {
        value >= self.low && value < self.high
    }
}

impl fmt::Display for SequenceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.low, self.high)
    }
}

const BEFORE_1900: &[SequenceRange] = &[SequenceRange::new(500, 750)];
const FROM_1900: &[SequenceRange] = &[SequenceRange::new(0, 500)];
const FROM_1940: &[SequenceRange] = &[SequenceRange::new(0, 500), SequenceRange::new(900, 1000)];
const FROM_2000: &[SequenceRange] = &[SequenceRange::new(500, 1000)];

/// 依出生年份決定可用序號區間的規則
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EraPolicy {
    #[default]
    Legacy,
    Extended,
}

impl EraPolicy {
    /// Ranges allocated in `year`, in the order they are enumerated.
    ///
    /// Every integer year is accepted; years far outside the historical
    /// span simply fall on one side of the boundaries.
    pub fn select_ranges(self, year: i32) -> &'static [SequenceRange] {
        match self {
            EraPolicy::Legacy => {
                if year < 1900 {
                    BEFORE_1900
                } else {
                    FROM_1900
                }
            }
            EraPolicy::Extended => match year {
                y if y < 1900 => BEFORE_1900,
                y if y < 1940 => FROM_1900,
                y if y < 2000 => FROM_1940,
                _ => FROM_2000,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EraPolicy::Legacy => "legacy",
            EraPolicy::Extended => "extended",
        }
    }
}

impl FromStr for EraPolicy {
    type Err = PnrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(EraPolicy::Legacy),
            "extended" => Ok(EraPolicy::Extended),
            other => Err(PnrError::InvalidConfigValueError {
                field: "generator.era_policy".to_string(),
                value: other.to_string(),
                reason: "Valid values: legacy, extended".to_string(),
            }),
        }
    }
}

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::era::SequenceRange;
use crate::domain::model::{Gender, SequenceNumber};
use crate::utils::error::PnrError;

/// 序號的產生順序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderingPolicy {
    /// Every value once, ascending, range by range. Finite.
    #[serde(rename = "sequential", alias = "sequential-once")]
    SequentialOnce,
    /// Walks the domain in a repeating cycle. Infinite.
    #[default]
    #[serde(rename = "cyclic", alias = "cyclic-repeat")]
    CyclicRepeat,
    /// Independent uniform draws over the domain. Infinite.
    #[serde(rename = "random", alias = "uniform-random")]
    UniformRandom,
}

impl OrderingPolicy {
    pub fn is_infinite(&self) -> bool {
        !matches!(self, OrderingPolicy::SequentialOnce)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderingPolicy::SequentialOnce => "sequential",
            OrderingPolicy::CyclicRepeat => "cyclic",
            OrderingPolicy::UniformRandom => "random",
        }
    }
}

impl FromStr for OrderingPolicy {
    type Err = PnrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "sequential-once" => Ok(OrderingPolicy::SequentialOnce),
            "cyclic" | "cyclic-repeat" => Ok(OrderingPolicy::CyclicRepeat),
            "random" | "uniform-random" => Ok(OrderingPolicy::UniformRandom),
            other => Err(PnrError::InvalidConfigValueError {
                field: "generator.ordering".to_string(),
                value: other.to_string(),
                reason: "Valid values: sequential, cyclic, random".to_string(),
            }),
        }
    }
}

/// The concatenation of several ranges, addressed by a single index.
#[derive(Debug, Clone, Copy)]
pub struct SequenceDomain {
    ranges: &'static [SequenceRange],
    len: usize,
}

impl SequenceDomain {
    pub fn new(ranges: &'static [SequenceRange]) -> Self {
        let len = ranges.iter().map(SequenceRange::len).sum();
        Self { ranges, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn ranges(&self) -> &'static [SequenceRange] {
        self.ranges
    }

    /// 第 `index` 個值；超出範圍時回傳 None
    pub fn get(&self, mut index: usize) -> Option<u16> {
        for range in self.ranges {
            if index < range.len() {
                return Some(range.low + index as u16);
            }
            index -= range.len();
        }
        None
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.ranges.iter().flat_map(|r| r.low..r.high)
    }
}

/// Raw candidate stream over a domain, before the gender filter.
///
/// `R` is only drawn from under [`OrderingPolicy::UniformRandom`].
#[derive(Debug, Clone)]
pub struct Candidates<R> {
    domain: SequenceDomain,
    ordering: OrderingPolicy,
    cursor: usize,
    rng: R,
}

impl<R: Rng> Candidates<R> {
    pub fn new(ranges: &'static [SequenceRange], ordering: OrderingPolicy, rng: R) -> Self {
        Self {
            domain: SequenceDomain::new(ranges),
            ordering,
            cursor: 0,
            rng,
        }
    }

    pub fn domain(&self) -> &SequenceDomain {
        &self.domain
    }

    pub fn ordering(&self) -> OrderingPolicy {
        self.ordering
    }

    /// 套用性別奇偶過濾
    pub fn for_gender(self, gender: Gender) -> GenderCandidates<R> {
        GenderCandidates {
            candidates: self,
            gender,
        }
    }
}

impl<R: Rng> Iterator for Candidates<R> {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        let len = self.domain.len();
        if len == 0 {
            return None;
        }

        match self.ordering {
            OrderingPolicy::SequentialOnce => {
                let value = self.domain.get(self.cursor)?;
                self.cursor += 1;
                Some(value)
            }
            OrderingPolicy::CyclicRepeat => {
                let value = self.domain.get(self.cursor);
                self.cursor = (self.cursor + 1) % len;
                value
            }
            OrderingPolicy::UniformRandom => {
                let index = self.rng.random_range(0..len);
                self.domain.get(index)
            }
        }
    }

    // `skip(n)` lands here, so raw skips on the deterministic orderings are O(1).
    fn nth(&mut self, n: usize) -> Option<u16> {
        let len = self.domain.len();
        if len == 0 {
            return None;
        }

        match self.ordering {
            OrderingPolicy::SequentialOnce => {
                self.cursor = self.cursor.saturating_add(n).min(len);
            }
            OrderingPolicy::CyclicRepeat => {
                self.cursor = (self.cursor + n % len) % len;
            }
            OrderingPolicy::UniformRandom => {
                for _ in 0..n {
                    self.rng.random_range(0..len);
                }
            }
        }
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.ordering {
            OrderingPolicy::SequentialOnce => {
                let remaining = self.domain.len().saturating_sub(self.cursor);
                (remaining, Some(remaining))
            }
            _ if self.domain.is_empty() => (0, Some(0)),
            _ => (usize::MAX, None),
        }
    }
}

/// Candidates of one gender: the raw stream with the parity filter applied.
///
/// This is the only place the parity rule is applied to a stream.
#[derive(Debug, Clone)]
pub struct GenderCandidates<R> {
    candidates: Candidates<R>,
    gender: Gender,
}

impl<R: Rng> GenderCandidates<R> {
    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn ordering(&self) -> OrderingPolicy {
        self.candidates.ordering()
    }

    pub fn domain(&self) -> &SequenceDomain {
        self.candidates.domain()
    }

    /// Every domain value this gender may use, each once.
    pub fn eligible(&self) -> impl Iterator<Item = SequenceNumber> + '_ {
        let gender = self.gender;
        self.candidates
            .domain()
            .iter()
            .filter(move |v| gender.accepts(*v))
            .filter_map(SequenceNumber::new)
    }

    /// Drops `n` raw candidates, before the parity filter.
    pub fn skip_raw(&mut self, n: usize) {
        if n > 0 {
            self.candidates.nth(n - 1);
        }
    }
}

impl<R: Rng> Iterator for GenderCandidates<R> {
    type Item = SequenceNumber;

    fn next(&mut self) -> Option<SequenceNumber> {
        loop {
            let value = self.candidates.next()?;
            if !self.gender.accepts(value) {
                continue;
            }
            if let Some(sequence) = SequenceNumber::new(value) {
                return Some(sequence);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.candidates.size_hint().1)
    }
}

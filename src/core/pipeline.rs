use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::iter::Skip;
use std::str::FromStr;

use crate::core::checksum::validate;
use crate::core::enumerator::{Candidates, GenderCandidates, OrderingPolicy};
use crate::core::era::EraPolicy;
use crate::core::ConfigProvider;
use crate::domain::model::{BaseDigits, BirthDate, Gender, IdentityNumber};
use crate::utils::error::{PnrError, Result};

/// Where a `skip(n)` is applied in the pipeline.
///
/// The two placements are not equivalent: `Raw` drops `n` enumerated
/// candidates before the parity and checksum filters, `Validated` drops `n`
/// finished identity numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipStage {
    Raw,
    #[default]
    Validated,
}

impl FromStr for SkipStage {
    type Err = PnrError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(SkipStage::Raw),
            "validated" => Ok(SkipStage::Validated),
            other => Err(PnrError::InvalidConfigValueError {
                field: "generator.skip_stage".to_string(),
                value: other.to_string(),
                reason: "Valid values: raw, validated".to_string(),
            }),
        }
    }
}

/// Lazy stream of validated identity numbers for one date and gender.
pub struct IdentityNumbers<R> {
    date: BirthDate,
    candidates: GenderCandidates<R>,
    viable: bool,
    rejected: usize,
}

impl<R: Rng> IdentityNumbers<R> {
    pub fn new(date: BirthDate, candidates: GenderCandidates<R>) -> Self {
        // 無限來源若整個區間都沒有合法號碼會永遠空轉
        let viable = !candidates.ordering().is_infinite()
            || candidates
                .eligible()
                .any(|seq| validate(&BaseDigits::new(&date, seq)).is_ok());

        if !viable {
            tracing::debug!(
                "No valid {} number exists for {}, stream is empty",
                candidates.gender(),
                date
            );
        }

        Self {
            date,
            candidates,
            viable,
            rejected: 0,
        }
    }

    /// Candidates dropped by the checksum stage so far.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Drops `n` raw candidates before any filtering.
    pub fn skip_raw(mut self, n: usize) -> Self {
        self.candidates.skip_raw(n);
        self
    }

    pub fn skip_at(self, stage: SkipStage, n: usize) -> Skip<Self> {
        match stage {
            SkipStage::Raw => self.skip_raw(n).skip(0),
            SkipStage::Validated => self.skip(n),
        }
    }
}

impl<R: Rng> Iterator for IdentityNumbers<R> {
    type Item = IdentityNumber;

    fn next(&mut self) -> Option<IdentityNumber> {
        if !self.viable {
            return None;
        }

        loop {
            let sequence = self.candidates.next()?;
            let base = BaseDigits::new(&self.date, sequence);

            match validate(&base) {
                Ok(number) => return Some(number.with_birth_date(self.date)),
                Err(rejected) => {
                    self.rejected += 1;
                    tracing::trace!("Skipping {}: {}", base, rejected);
                }
            }
        }
    }
}

/// Era selection, enumeration and checksum validation wired together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Generator {
    era: EraPolicy,
    ordering: OrderingPolicy,
    skip_stage: SkipStage,
    seed: Option<u64>,
    strict_dates: bool,
}

impl Generator {
    pub fn new(era: EraPolicy, ordering: OrderingPolicy) -> Self {
        Self {
            era,
            ordering,
            ..Self::default()
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            era: config.era_policy(),
            ordering: config.ordering_policy(),
            skip_stage: config.skip_stage(),
            seed: config.seed(),
            strict_dates: config.strict_dates(),
        }
    }

    pub fn with_skip_stage(mut self, stage: SkipStage) -> Self {
        self.skip_stage = stage;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_strict_dates(mut self, strict: bool) -> Self {
        self.strict_dates = strict;
        self
    }

    pub fn era(&self) -> EraPolicy {
        self.era
    }

    pub fn ordering(&self) -> OrderingPolicy {
        self.ordering
    }

    pub fn skip_stage(&self) -> SkipStage {
        self.skip_stage
    }

    /// 設定了 seed 就固定結果，否則取作業系統亂數
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    pub fn parse_date(&self, date: &str) -> Result<BirthDate> {
        let parsed = BirthDate::parse(date)?;
        if self.strict_dates && !parsed.is_calendar_date() {
            return Err(PnrError::InvalidDate {
                input: date.to_string(),
                reason: "not a calendar date".to_string(),
            });
        }
        Ok(parsed)
    }

    /// Parses `YYYY-MM-DD` and `m`/`f`, then starts the lazy stream.
    pub fn generate(&self, date: &str, gender: &str) -> Result<IdentityNumbers<StdRng>> {
        let date = self.parse_date(date)?;
        let gender = Gender::parse(gender)?;
        Ok(self.generate_with_rng(date, gender, self.rng()))
    }

    pub fn generate_with_rng<R: Rng>(
        &self,
        date: BirthDate,
        gender: Gender,
        rng: R,
    ) -> IdentityNumbers<R> {
        let ranges = self.era.select_ranges(date.year);
        tracing::debug!(
            "Generating {} numbers for {} ({} era, {} order), ranges: {:?}",
            gender,
            date,
            self.era.as_str(),
            self.ordering.as_str(),
            ranges
        );
        IdentityNumbers::new(
            date,
            Candidates::new(ranges, self.ordering, rng).for_gender(gender),
        )
    }

    /// `skip` at the configured stage followed by `take(count)`.
    pub fn page(
        &self,
        date: &str,
        gender: &str,
        skip: usize,
        count: usize,
    ) -> Result<Vec<IdentityNumber>> {
        Ok(self
            .generate(date, gender)?
            .skip_at(self.skip_stage, skip)
            .take(count)
            .collect())
    }
}

/// `generate(date, gender)` with the default policies.
pub fn generate(date: &str, gender: &str) -> Result<IdentityNumbers<StdRng>> {
    Generator::default().generate(date, gender)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::era::SequenceRange;

    fn seeded(ordering: OrderingPolicy) -> Generator {
        Generator::new(EraPolicy::Extended, ordering).with_seed(Some(11))
    }

    #[test]
    fn test_first_sequential_number_for_reference_date() {
        let first = Generator::new(EraPolicy::Legacy, OrderingPolicy::SequentialOnce)
            .generate("1937-02-21", "m")
            .unwrap()
            .next()
            .unwrap();
        assert_eq!(first.to_string(), "21023700163");
        assert_eq!(first.birth_date().unwrap().year, 1937);
    }

    #[test]
    fn test_default_pipeline() {
        let numbers: Vec<String> = generate("1937-02-21", "m")
            .unwrap()
            .take(3)
            .map(|n| n.to_string())
            .collect();
        assert_eq!(numbers.len(), 3);
        assert_eq!(numbers[0], "21023700163");
    }

    #[test]
    fn test_sequential_source_is_finite() {
        let generator = seeded(OrderingPolicy::SequentialOnce);
        let all: Vec<IdentityNumber> = generator.generate("1850-05-05", "f").unwrap().collect();
        assert!(!all.is_empty());
        assert!(all.len() <= 125);

        let page = generator.page("1850-05-05", "f", 0, 1000).unwrap();
        assert_eq!(page.len(), all.len());
    }

    #[test]
    fn test_infinite_sources_fill_a_page() {
        for ordering in [OrderingPolicy::CyclicRepeat, OrderingPolicy::UniformRandom] {
            for stage in [SkipStage::Raw, SkipStage::Validated] {
                let page = seeded(ordering)
                    .with_skip_stage(stage)
                    .page("1999-12-31", "f", 977, 20)
                    .unwrap();
                assert_eq!(page.len(), 20);
            }
        }
    }

    #[test]
    fn test_skip_stages_differ() {
        let generator = seeded(OrderingPolicy::CyclicRepeat);
        let raw = generator
            .with_skip_stage(SkipStage::Raw)
            .page("1937-02-21", "m", 10, 1)
            .unwrap();
        let validated = generator
            .with_skip_stage(SkipStage::Validated)
            .page("1937-02-21", "m", 10, 1)
            .unwrap();
        assert_ne!(raw, validated);
    }

    #[test]
    fn test_seeded_random_is_deterministic() {
        let generator = seeded(OrderingPolicy::UniformRandom);
        let a = generator.page("2004-07-01", "m", 0, 20).unwrap();
        let b = generator.page("2004-07-01", "m", 0, 20).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_strict_dates_rejects_impossible_date() {
        let generator = Generator::default().with_strict_dates(true);
        assert!(generator.generate("1990-02-30", "m").is_err());
        assert!(Generator::default().generate("1990-02-30", "m").is_ok());
    }

    // 210237 + 025 fails the first check digit, 027 the second
    const NO_VALID_MALE: &[SequenceRange] = &[SequenceRange::new(25, 28)];

    #[test]
    fn test_infinite_source_without_valid_member_is_empty() {
        let date = BirthDate::parse("1937-02-21").unwrap();

        for ordering in [OrderingPolicy::CyclicRepeat, OrderingPolicy::UniformRandom] {
            let candidates = Candidates::new(NO_VALID_MALE, ordering, StdRng::seed_from_u64(1))
                .for_gender(Gender::Male);
            let mut numbers = IdentityNumbers::new(date, candidates);
            assert_eq!(numbers.next(), None);
            assert_eq!(numbers.rejected(), 0);
        }

        let finite = Candidates::new(
            NO_VALID_MALE,
            OrderingPolicy::SequentialOnce,
            StdRng::seed_from_u64(1),
        )
        .for_gender(Gender::Male);
        let mut numbers = IdentityNumbers::new(date, finite);
        assert_eq!(numbers.by_ref().count(), 0);
        assert_eq!(numbers.rejected(), 2);
    }

    #[test]
    fn test_rejections_are_counted() {
        let mut numbers = seeded(OrderingPolicy::SequentialOnce)
            .generate("1937-02-21", "m")
            .unwrap();
        let produced = numbers.by_ref().count();
        assert_eq!(produced + numbers.rejected(), 250);
    }
}

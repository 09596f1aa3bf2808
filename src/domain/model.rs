use crate::utils::error::{PnrError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 出生日期。月份與日期不做日曆檢查，只要求能放進兩位數
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BirthDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl BirthDate {
    /// Parses `YYYY-MM-DD` by splitting on `-`.
    ///
    /// Month 13 or February 30 are accepted; each field only has to be a
    /// number that fits the two-digit slot of the base digits.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = |reason: &str| PnrError::InvalidDate {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = trimmed.split('-').collect();
        if parts.len() != 3 {
            return Err(invalid("expected three '-' separated fields"));
        }

        let year: i32 = parts[0]
            .parse()
            .map_err(|_| invalid("year is not a number"))?;
        let month: u8 = parts[1]
            .parse()
            .map_err(|_| invalid("month is not a number"))?;
        let day: u8 = parts[2]
            .parse()
            .map_err(|_| invalid("day is not a number"))?;

        if month > 99 || day > 99 {
            return Err(invalid("month and day must fit in two digits"));
        }

        Ok(Self { year, month, day })
    }

    /// 年份後兩位
    pub fn short_year(&self) -> u8 {
        self.year.rem_euclid(100) as u8
    }

    /// Calendar check, only used when `strict_dates` is enabled.
    pub fn is_calendar_date(&self) -> bool {
        chrono::NaiveDate::from_ymd_opt(self.year, self.month as u32, self.day as u32).is_some()
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "f")]
    Female,
}

impl Gender {
    pub fn parse(input: &str) -> Result<Self> {
        match input.trim() {
            "m" => Ok(Gender::Male),
            "f" => Ok(Gender::Female),
            _ => Err(PnrError::InvalidGender {
                input: input.to_string(),
            }),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "m",
            Gender::Female => "f",
        }
    }

    /// Parity filter: a value is dropped when `is_female XOR is_even` holds,
    /// so even numbers belong to women and odd numbers to men.
    pub fn accepts(&self, value: u16) -> bool {
        let female = matches!(self, Gender::Female) as u8;
        let even = (value % 2 == 0) as u8;
        (female ^ even) == 0
    }

    pub fn from_sequence(sequence: SequenceNumber) -> Self {
        if sequence.is_even() {
            Gender::Female
        } else {
            Gender::Male
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 個人序號 (0..=999)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceNumber(u16);

impl SequenceNumber {
    pub const MAX: u16 = 999;

    pub fn new(value: u16) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    pub fn value(&self) -> u16 {
        self.0
    }

    pub fn is_even(&self) -> bool {
        self.0 % 2 == 0
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// The nine digits DDMMYYSSS that both checksums are computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BaseDigits([u8; 9]);

impl BaseDigits {
    pub fn new(date: &BirthDate, sequence: SequenceNumber) -> Self {
        let yy = date.short_year();
        let seq = sequence.value();
        Self([
            date.day / 10,
            date.day % 10,
            date.month / 10,
            date.month % 10,
            yy / 10,
            yy % 10,
            (seq / 100) as u8,
            (seq / 10 % 10) as u8,
            (seq % 10) as u8,
        ])
    }

    /// 每個元素都必須是 0..=9
    pub fn from_digits(digits: [u8; 9]) -> Option<Self> {
        digits.iter().all(|d| *d <= 9).then_some(Self(digits))
    }

    pub fn digits(&self) -> &[u8; 9] {
        &self.0
    }

    pub fn sequence(&self) -> SequenceNumber {
        let [.., i1, i2, i3] = self.0;
        SequenceNumber(i1 as u16 * 100 + i2 as u16 * 10 + i3 as u16)
    }
}

impl fmt::Display for BaseDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in self.0 {
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}

/// A number whose two check digits are known to be valid.
///
/// Only [`crate::core::checksum::validate`] constructs these, so holding one
/// means both checksums pass. No century sign is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityNumber {
    base: BaseDigits,
    check: [u8; 2],
    birth_date: Option<BirthDate>,
}

impl IdentityNumber {
    pub(crate) fn new(base: BaseDigits, check: [u8; 2]) -> Self {
        Self {
            base,
            check,
            birth_date: None,
        }
    }

    pub(crate) fn with_birth_date(mut self, date: BirthDate) -> Self {
        self.birth_date = Some(date);
        self
    }

    pub fn base(&self) -> &BaseDigits {
        &self.base
    }

    pub fn check_digits(&self) -> [u8; 2] {
        self.check
    }

    pub fn sequence(&self) -> SequenceNumber {
        self.base.sequence()
    }

    pub fn gender(&self) -> Gender {
        Gender::from_sequence(self.sequence())
    }

    /// 產生時的完整出生日期；由號碼反推時為 None
    pub fn birth_date(&self) -> Option<BirthDate> {
        self.birth_date
    }

    /// 日、月、年後兩位
    pub fn date_digits(&self) -> (u8, u8, u8) {
        let d = self.base.digits();
        (d[0] * 10 + d[1], d[2] * 10 + d[3], d[4] * 10 + d[5])
    }
}

impl fmt::Display for IdentityNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.base, self.check[0], self.check[1])
    }
}

/// 瀏覽清單中的一筆號碼
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub value: String,
    pub checked: bool,
}

/// Last date and gender typed into the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub date: String,
    pub gender: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPerson {
    pub name: String,
    pub date: String,
    pub gender: String,
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonPage {
    pub person: SavedPerson,
    pub entries: Vec<Entry>,
}

//! Dual weighted-sum mod-11 check digits.
//!
//! Digit layout of the base is `d1 d2 m1 m2 y1 y2 i1 i2 i3`. A check digit
//! of 10 cannot be written as one digit, so such a candidate is rejected
//! rather than wrapped.

use std::fmt;

use crate::domain::model::{BaseDigits, IdentityNumber};
use crate::utils::error::{PnrError, Result};

const WEIGHTS_1: [u32; 9] = [3, 7, 6, 1, 8, 9, 4, 5, 2];
const WEIGHTS_2: [u32; 10] = [5, 4, 3, 2, 7, 6, 5, 4, 3, 2];

/// 無法產生單一位數檢查碼的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    FirstCheckDigit,
    SecondCheckDigit,
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejected::FirstCheckDigit => f.write_str("first check digit would be 10"),
            Rejected::SecondCheckDigit => f.write_str("second check digit would be 10"),
        }
    }
}

fn reduce(sum: u32) -> u8 {
    match sum % 11 {
        0 => 0,
        r => (11 - r) as u8,
    }
}

/// First check digit in `0..=10`; 10 marks an unusable base.
pub fn checksum1(digits: &[u8; 9]) -> u8 {
    let sum: u32 = digits
        .iter()
        .zip(WEIGHTS_1)
        .map(|(d, w)| *d as u32 * w)
        .sum();
    reduce(sum)
}

/// Second check digit in `0..=10`, weighing the first check digit last.
pub fn checksum2(digits: &[u8; 9], k1: u8) -> u8 {
    let sum: u32 = digits
        .iter()
        .chain(std::iter::once(&k1))
        .zip(WEIGHTS_2)
        .map(|(d, w)| *d as u32 * w)
        .sum();
    reduce(sum)
}

pub fn validate(base: &BaseDigits) -> std::result::Result<IdentityNumber, Rejected> {
    let digits = base.digits();

    let k1 = checksum1(digits);
    if k1 == 10 {
        return Err(Rejected::FirstCheckDigit);
    }

    let k2 = checksum2(digits, k1);
    if k2 == 10 {
        return Err(Rejected::SecondCheckDigit);
    }

    Ok(IdentityNumber::new(*base, [k1, k2]))
}

/// Checks an existing 11-digit number by recomputing both check digits.
pub fn verify(input: &str) -> Result<IdentityNumber> {
    let trimmed = input.trim();
    let invalid = |reason: String| PnrError::InvalidNumber {
        input: trimmed.to_string(),
        reason,
    };

    if trimmed.len() != 11 {
        return Err(invalid(format!(
            "expected 11 digits, got {} characters",
            trimmed.chars().count()
        )));
    }

    let mut digits = [0u8; 11];
    for (slot, byte) in digits.iter_mut().zip(trimmed.bytes()) {
        if !byte.is_ascii_digit() {
            return Err(invalid("contains a non-digit character".to_string()));
        }
        *slot = byte - b'0';
    }

    let mut base = [0u8; 9];
    base.copy_from_slice(&digits[..9]);
    let base = BaseDigits::from_digits(base)
        .ok_or_else(|| invalid("contains a non-digit character".to_string()))?;

    let number = validate(&base).map_err(|rejected| invalid(rejected.to_string()))?;
    if number.check_digits() != [digits[9], digits[10]] {
        return Err(invalid("check digit mismatch".to_string()));
    }

    Ok(number)
}

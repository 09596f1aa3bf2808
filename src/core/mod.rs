pub mod checksum;
pub mod enumerator;
pub mod era;
pub mod export;
pub mod pipeline;

pub use crate::domain::model::{BaseDigits, BirthDate, Gender, IdentityNumber, SequenceNumber};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;

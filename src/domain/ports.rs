use crate::core::enumerator::OrderingPolicy;
use crate::core::era::EraPolicy;
use crate::core::pipeline::SkipStage;
use crate::utils::error::Result;

/// Best-effort key-value store holding JSON strings, in the spirit of a
/// browser's local storage.
pub trait Storage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn era_policy(&self) -> EraPolicy;
    fn ordering_policy(&self) -> OrderingPolicy;
    fn skip_stage(&self) -> SkipStage;
    fn seed(&self) -> Option<u64>;
    fn strict_dates(&self) -> bool;
    fn page_size(&self) -> usize;
    fn random_skip_max(&self) -> usize;
    fn default_date(&self) -> &str;
    fn default_gender(&self) -> &str;
}

pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::storage::{LocalStorage, MemoryStorage};
pub use app::browser::Browser;
pub use config::GeneratorConfig;
pub use crate::core::{
    checksum::verify,
    enumerator::OrderingPolicy,
    era::EraPolicy,
    pipeline::{generate, Generator, IdentityNumbers, SkipStage},
};
pub use utils::error::{PnrError, Result};

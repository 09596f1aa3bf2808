use crate::core::enumerator::OrderingPolicy;
use crate::core::era::EraPolicy;
use crate::core::pipeline::SkipStage;
use crate::core::ConfigProvider;
use crate::domain::model::{BirthDate, Gender};
use crate::utils::error::{PnrError, Result};
use crate::utils::logger::LOG_LEVELS;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DATE: &str = "1937-02-21";
pub const DEFAULT_GENDER: &str = "m";
pub const DEFAULT_STATE_DIR: &str = "./.personnummer";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub generator: GeneratorSection,
    pub browser: BrowserSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSection {
    pub era_policy: EraPolicy,
    pub ordering: OrderingPolicy,
    pub skip_stage: SkipStage,
    pub seed: Option<u64>,
    pub strict_dates: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSection {
    pub page_size: usize,
    pub random_skip_max: usize,
    pub default_date: String,
    pub default_gender: String,
    pub state_dir: String,
}

impl Default for BrowserSection {
    fn default() -> Self {
        Self {
            page_size: 20,
            random_skip_max: 1000,
            default_date: DEFAULT_DATE.to_string(),
            default_gender: DEFAULT_GENDER.to_string(),
            state_dir: DEFAULT_STATE_DIR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PnrError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PnrError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PNR_SEED})，找不到時保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PnrError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_positive_number("browser.page_size", self.browser.page_size, 1)?;
        validation::validate_positive_number(
            "browser.random_skip_max",
            self.browser.random_skip_max,
            1,
        )?;
        validation::validate_path("browser.state_dir", &self.browser.state_dir)?;

        BirthDate::parse(&self.browser.default_date).map_err(|e| {
            PnrError::ConfigValidationError {
                field: "browser.default_date".to_string(),
                message: e.to_string(),
            }
        })?;
        Gender::parse(&self.browser.default_gender).map_err(|e| {
            PnrError::ConfigValidationError {
                field: "browser.default_gender".to_string(),
                message: e.to_string(),
            }
        })?;

        validation::validate_one_of("logging.level", &self.logging.level, LOG_LEVELS)?;
        validation::validate_one_of("logging.format", &self.logging.format, &["compact", "json"])?;

        Ok(())
    }

    pub fn state_dir(&self) -> &str {
        &self.browser.state_dir
    }
}

impl ConfigProvider for GeneratorConfig {
    fn era_policy(&self) -> EraPolicy {
        self.generator.era_policy
    }

    fn ordering_policy(&self) -> OrderingPolicy {
        self.generator.ordering
    }

    fn skip_stage(&self) -> SkipStage {
        self.generator.skip_stage
    }

    fn seed(&self) -> Option<u64> {
        self.generator.seed
    }

    fn strict_dates(&self) -> bool {
        self.generator.strict_dates
    }

    fn page_size(&self) -> usize {
        self.browser.page_size
    }

    fn random_skip_max(&self) -> usize {
        self.browser.random_skip_max
    }

    fn default_date(&self) -> &str {
        &self.browser.default_date
    }

    fn default_gender(&self) -> &str {
        &self.browser.default_gender
    }
}

impl Validate for GeneratorConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = GeneratorConfig::from_toml_str("").unwrap();

        assert_eq!(config.era_policy(), EraPolicy::Legacy);
        assert_eq!(config.ordering_policy(), OrderingPolicy::CyclicRepeat);
        assert_eq!(config.skip_stage(), SkipStage::Validated);
        assert_eq!(config.page_size(), 20);
        assert_eq!(config.random_skip_max(), 1000);
        assert_eq!(config.default_date(), "1937-02-21");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[generator]
era_policy = "extended"
ordering = "random"
skip_stage = "raw"
seed = 42
strict_dates = true

[browser]
page_size = 10
random_skip_max = 50
default_date = "2001-04-30"
default_gender = "f"
state_dir = "/tmp/pnr"

[logging]
level = "debug"
format = "json"
"#;

        let config = GeneratorConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.era_policy(), EraPolicy::Extended);
        assert_eq!(config.ordering_policy(), OrderingPolicy::UniformRandom);
        assert_eq!(config.skip_stage(), SkipStage::Raw);
        assert_eq!(config.seed(), Some(42));
        assert!(config.strict_dates());
        assert_eq!(config.page_size(), 10);
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_every_log_level_is_accepted() {
        for level in LOG_LEVELS {
            let config =
                GeneratorConfig::from_toml_str(&format!("[logging]\nlevel = \"{}\"", level))
                    .unwrap();
            assert_eq!(config.logging.level, *level);
            assert!(config.validate().is_ok());
        }

        let config = GeneratorConfig::from_toml_str("[logging]\nlevel = \"loud\"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PNR_TEST_STATE_DIR", "/var/lib/pnr");

        let toml_content = r#"
[browser]
state_dir = "${PNR_TEST_STATE_DIR}"
"#;

        let config = GeneratorConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.state_dir(), "/var/lib/pnr");

        std::env::remove_var("PNR_TEST_STATE_DIR");
    }

    #[test]
    fn test_config_validation() {
        let config = GeneratorConfig::from_toml_str(
            r#"
[browser]
page_size = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = GeneratorConfig::from_toml_str(
            r#"
[browser]
default_gender = "x"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_policy_is_a_parse_error() {
        let result = GeneratorConfig::from_toml_str(
            r#"
[generator]
ordering = "shuffled"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[generator]\nera_policy = \"extended\"\n")
            .unwrap();

        let config = GeneratorConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.era_policy(), EraPolicy::Extended);
    }
}

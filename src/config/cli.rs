use crate::config::toml_config::GeneratorConfig;
use crate::core::enumerator::OrderingPolicy;
use crate::core::era::EraPolicy;
use crate::core::export::ExportFormat;
use crate::core::pipeline::SkipStage;
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "personnummer-gen")]
#[command(about = "Generate, verify and browse Swedish personal identity numbers")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format (compact or json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Directory holding browser state, overrides the config file
    #[arg(long, global = true)]
    pub state_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate identity numbers for a birth date and gender
    Generate(GenerateArgs),

    /// Check existing 11-digit numbers
    Verify {
        #[arg(required = true)]
        numbers: Vec<String>,
    },

    /// Show the sequence ranges allocated for a birth year
    Ranges {
        #[arg(long, allow_hyphen_values = true)]
        year: i32,

        #[arg(long)]
        era: Option<EraPolicy>,
    },

    /// Browse, mark and save candidates with persisted state
    Browse {
        #[command(subcommand)]
        action: BrowseCommand,
    },
}

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Birth date as YYYY-MM-DD
    #[arg(short, long)]
    pub date: String,

    /// Gender, m or f
    #[arg(short, long)]
    pub gender: String,

    /// How many numbers to print (defaults to browser.page_size)
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    #[arg(long, default_value = "0")]
    pub skip: usize,

    #[arg(long)]
    pub skip_stage: Option<SkipStage>,

    #[arg(long)]
    pub era: Option<EraPolicy>,

    #[arg(long)]
    pub ordering: Option<OrderingPolicy>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// plain, csv, tsv or json
    #[arg(short, long, default_value = "plain")]
    pub format: ExportFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum BrowseCommand {
    /// Show a fresh page at a random offset
    Refresh {
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        gender: Option<String>,
    },
    /// Mark a number as used
    Mark { value: String },
    /// Remove a mark
    Unmark { value: String },
    /// Save a person for later paging
    Save {
        #[arg(long)]
        name: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        gender: String,
    },
    /// Delete a saved person
    Delete {
        #[arg(long)]
        name: String,
    },
    /// Move a saved person one page forward, or back with --back
    More {
        #[arg(long)]
        name: String,
        #[arg(long)]
        back: bool,
    },
    /// List saved people with their current page
    People,
}

impl CliConfig {
    /// 載入設定檔（未指定時使用預設值），再套用命令列覆蓋
    pub fn load_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_file(path)?,
            None => GeneratorConfig::default(),
        };

        if let Some(state_dir) = &self.state_dir {
            config.browser.state_dir = state_dir.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
        if let Command::Generate(args) = &self.command {
            args.apply_overrides(&mut config);
        }

        Ok(config)
    }
}

impl GenerateArgs {
    pub fn apply_overrides(&self, config: &mut GeneratorConfig) {
        if let Some(era) = self.era {
            config.generator.era_policy = era;
        }
        if let Some(ordering) = self.ordering {
            config.generator.ordering = ordering;
        }
        if let Some(stage) = self.skip_stage {
            config.generator.skip_stage = stage;
        }
        if self.seed.is_some() {
            config.generator.seed = self.seed;
        }
    }
}

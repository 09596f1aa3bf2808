use clap::Parser;
use personnummer_gen::config::cli::{BrowseCommand, Command, GenerateArgs};
use personnummer_gen::core::export::export;
use personnummer_gen::core::ConfigProvider;
use personnummer_gen::domain::model::Entry;
use personnummer_gen::utils::error::ErrorSeverity;
use personnummer_gen::utils::{logger, validation::Validate};
use personnummer_gen::{
    verify, Browser, CliConfig, EraPolicy, Generator, GeneratorConfig, LocalStorage, PnrError,
};
use std::fs::File;
use std::io::{self, BufWriter};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(&config.logging.format, &config.logging.level);
    tracing::debug!("CLI config: {:?}", cli);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(cli.command, config) {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn run(command: Command, config: GeneratorConfig) -> Result<(), PnrError> {
    match command {
        Command::Generate(args) => run_generate(&args, &config),
        Command::Verify { numbers } => {
            let mut all_valid = true;
            for number in &numbers {
                match verify(number) {
                    Ok(valid) => println!("{}\tvalid\t{}", valid, valid.gender()),
                    Err(e) => {
                        tracing::debug!("{}", e);
                        all_valid = false;
                        println!("{}\tinvalid", number.trim());
                    }
                }
            }
            if !all_valid {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Ranges { year, era } => {
            let era = era.unwrap_or(config.era_policy());
            print_ranges(year, era);
            Ok(())
        }
        Command::Browse { action } => run_browse(action, config),
    }
}

fn run_generate(args: &GenerateArgs, config: &GeneratorConfig) -> Result<(), PnrError> {
    let generator = Generator::from_config(config);
    let count = args.count.unwrap_or(config.page_size());

    let numbers = generator
        .generate(&args.date, &args.gender)?
        .skip_at(generator.skip_stage(), args.skip)
        .take(count);

    let written = match &args.output {
        Some(path) => {
            let file = File::create(path)?;
            let written = export(numbers, args.format, BufWriter::new(file))?;
            tracing::info!("📁 Output saved to: {}", path);
            written
        }
        None => export(numbers, args.format, io::stdout().lock())?,
    };

    if written < count {
        tracing::warn!(
            "Only {} of {} requested numbers exist for {} {}",
            written,
            count,
            args.date,
            args.gender
        );
    }
    Ok(())
}

fn run_browse(action: BrowseCommand, config: GeneratorConfig) -> Result<(), PnrError> {
    let storage = LocalStorage::new(config.state_dir().to_string());
    let mut browser = Browser::new(storage, config);

    match action {
        BrowseCommand::Refresh { date, gender } => {
            let prefs = browser.preferences();
            let date = date.unwrap_or(prefs.date);
            let gender = gender.unwrap_or(prefs.gender);

            match browser.refresh(&date, &gender)? {
                Some(entries) => print_entries(&entries),
                None => println!("Nothing to show: date and gender are required"),
            }
        }
        BrowseCommand::Mark { value } => browser.mark_entry(&value, true)?,
        BrowseCommand::Unmark { value } => browser.mark_entry(&value, false)?,
        BrowseCommand::Save { name, date, gender } => {
            if !browser.save_person(&name, &date, &gender)? {
                println!("Nothing saved: name, date and gender are required");
            }
        }
        BrowseCommand::Delete { name } => {
            let removed = browser.delete_person(&name)?;
            let noun = if removed == 1 { "person" } else { "people" };
            println!("Removed {} saved {}", removed, noun);
        }
        BrowseCommand::More { name, back } => {
            let found = if back {
                browser.previous_page(&name)?
            } else {
                browser.next_page(&name)?
            };
            if !found {
                println!("No saved person named '{}'", name);
            }
        }
        BrowseCommand::People => {
            for page in browser.people() {
                println!(
                    "## {} ({} {}, offset {})",
                    page.person.name, page.person.date, page.person.gender, page.person.offset
                );
                print_entries(&page.entries);
            }
        }
    }

    Ok(())
}

fn print_entries(entries: &[Entry]) {
    for entry in entries {
        println!("[{}] {}", if entry.checked { "x" } else { " " }, entry.value);
    }
}

fn print_ranges(year: i32, era: EraPolicy) {
    let ranges = era.select_ranges(year);
    println!("{} ({} era):", year, era.as_str());
    for range in ranges {
        println!("  {}", range);
    }
}

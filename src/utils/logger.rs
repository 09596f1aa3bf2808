use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `[logging] level` 可接受的值
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Filter used when `RUST_LOG` is unset.
///
/// At `trace`/`debug` other crates log at `info` too; otherwise only this
/// crate's events at `level` and above pass.
pub fn default_directive(level: &str) -> String {
    match level {
        "trace" | "debug" => format!("personnummer_gen={},info", level),
        _ => format!("personnummer_gen={}", level),
    }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)))
}

pub fn init_cli_logger(level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(), // 方便交給日誌收集工具
        )
        .init();
}

/// 依照設定的格式初始化日誌，未知格式退回 compact
pub fn init_logger(format: &str, level: &str) {
    match format {
        "json" => init_json_logger(level),
        _ => init_cli_logger(level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_accepted_level_builds_a_filter() {
        for level in LOG_LEVELS {
            let directive = default_directive(level);
            assert!(directive.starts_with(&format!("personnummer_gen={}", level)));
            assert!(EnvFilter::try_new(&directive).is_ok(), "{}", directive);
        }
    }

    #[test]
    fn test_configured_level_is_kept() {
        assert_eq!(default_directive("info"), "personnummer_gen=info");
        assert_eq!(default_directive("error"), "personnummer_gen=error");
        assert_eq!(default_directive("warn"), "personnummer_gen=warn");
        assert_eq!(default_directive("debug"), "personnummer_gen=debug,info");
    }
}

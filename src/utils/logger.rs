use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Checked before `RUST_LOG`, so the map's logging can be tuned without
/// touching other tools sharing the shell.
pub const LOG_ENV: &str = "MEAL_MAP_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    /// One JSON object per line, for runs collected by a log shipper.
    Json,
}

impl LogFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "meal_map=debug,info"
    } else {
        "meal_map=info"
    }
}

fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

pub fn init_logger(format: LogFormat, verbose: bool) {
    let registry = tracing_subscriber::registry().with(build_filter(verbose));
    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false);

    match format {
        LogFormat::Compact => registry
            .with(layer.with_file(false).with_line_number(false).compact())
            .init(),
        // JSON 日誌保留來源位置，方便在收集端追查
        LogFormat::Json => registry
            .with(layer.with_file(true).with_line_number(true).json())
            .init(),
    }
}

//----------------------------------------------------------------------------------------- std lib
use std::io::Write;
use std::path::Path;
use std::time::Instant;
//--------------------------------------------------------------------------------- other libraries
use log::info;
use once_cell::sync::Lazy;

// This will get initialized below.
/// Returns the init [`Instant`]
pub static INIT_INSTANT: Lazy<Instant> = Lazy::new(Instant::now);

/// The single-letter tag a log line is prefixed with.
const fn level_tag(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "E",
        log::Level::Warn => "W",
        log::Level::Info => "I",
        log::Level::Debug => "D",
        log::Level::Trace => "T",
    }
}

//---------------------------------------------------------------------------------------------------- Logger init function
#[allow(clippy::module_name_repetitions)]
/// Initializes the logger.
///
/// This enables logging on all the internals of `distro`. Since the terminal belongs to the
/// interface while it runs, logs go to `log_file` when one is given, and to stderr otherwise.
///
/// Functionality is provided by [`log`], spans from [`tracing`] are forwarded through its `log`
/// feature.
///
/// If `RUST_LOG` is set it takes precedence, otherwise everything but distro's own crates is
/// silenced and those log at `filter`.
///
/// # Errors
///
/// Fails if the log file can't be opened.
///
/// # Panics
/// This must only be called _once_.
#[cfg(not(tarpaulin_include))]
pub fn init_logger(filter: log::LevelFilter, log_file: Option<&Path>) -> std::io::Result<()> {
    // Initialize timer.
    use crate::format_duration;
    let now = Lazy::force(&INIT_INSTANT);

    let mut builder = env_logger::Builder::new();
    let env = std::env::var("RUST_LOG").unwrap_or_default();
    if env.is_empty() {
        builder
            .filter_level(log::LevelFilter::Off)
            .filter_module("distro", filter);
    } else {
        builder.parse_filters(&env);
    }

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            builder
                .target(env_logger::Target::Pipe(Box::new(file)))
                .write_style(env_logger::WriteStyle::Never);
        }
        None => {
            builder.write_style(env_logger::WriteStyle::Auto);
        }
    }

    builder
        .format(move |buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                // Longest PATH in the repo: `tui/src/ui/widgets/search_select.rs` - `35` characters
                "| {style}{}{style:#} | {} | {: >36} @ {: <4} | {}",
                level_tag(record.level()),
                format_duration(&now.elapsed()),
                record.file_static().unwrap_or("???"),
                record.line().unwrap_or(0),
                record.args(),
            )
        })
        .init();

    if env.is_empty() {
        info!("Log Level (Flag) ... {filter}");
    } else {
        info!("Log Level (RUST_LOG) ... {env}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_level_tags_are_distinct() {
        let tags = [
            log::Level::Error,
            log::Level::Warn,
            log::Level::Info,
            log::Level::Debug,
            log::Level::Trace,
        ]
        .map(level_tag);
        assert_eq!(tags, ["E", "W", "I", "D", "T"]);
    }
}

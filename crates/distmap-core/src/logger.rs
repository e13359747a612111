//! Logging setup for the command line, benches and tests.
//!
//! [`init_with_level`] installs a stderr logger printing
//! `[   0.012s DEBUG raster::ties] message`. Records from the distmap crates
//! pass at the configured level; records from other crates only at
//! `Warn` and above, so dependencies do not flood transform traces.

use std::fmt::Arguments;
use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Environment variable read by [`level_from_env`].
pub const LOG_ENV: &str = "DISTMAP_LOG";

const OWN_PREFIX: &str = "distmap";

/// `distmap_raster::ties` -> `raster::ties`; foreign targets are kept.
fn short_target(target: &str) -> &str {
    match target.strip_prefix("distmap_") {
        Some(rest) => rest,
        None if target == OWN_PREFIX => "distmap",
        None => target,
    }
}

fn format_line(elapsed: f64, level: Level, target: &str, args: &Arguments<'_>) -> String {
    format!("[{elapsed:8.3}s {level:<5} {}] {args}", short_target(target))
}

struct TransformLogger {
    own_level: LevelFilter,
    foreign_level: LevelFilter,
    started: Instant,
}

impl TransformLogger {
    fn level_for(&self, target: &str) -> LevelFilter {
        if target.starts_with(OWN_PREFIX) {
            self.own_level
        } else {
            self.foreign_level
        }
    }
}

impl Log for TransformLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            self.started.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            record.args(),
        );
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<TransformLogger> = OnceLock::new();

/// Install the stderr logger. The first call wins; later calls return
/// `Ok` without changing the level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| TransformLogger {
        own_level: level,
        foreign_level: level.min(LevelFilter::Warn),
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Level named by `DISTMAP_LOG` (`off`, `error`, ..., `trace`), or
/// `default` when unset or unparsable.
pub fn level_from_env(default: LevelFilter) -> LevelFilter {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Install a `tracing` subscriber. `RUST_LOG` wins when set; otherwise the
/// distmap crates log at `info` and everything else at `warn`.
///
/// Spans report their duration when they close, which times every
/// instrumented transform.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "warn,distmap=info,distmap_core=info,distmap_raster=info,\
             distmap_separable=info,distmap_grey=info",
        )
    });
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}

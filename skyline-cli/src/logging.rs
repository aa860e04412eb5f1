//! Log output for the `skyline` binary.
//!
//! Events go to stderr so that reports printed on stdout can be piped
//! cleanly. A log file can be attached once the settings are known; it gets
//! the same lines with a local timestamp in front.

use std::fmt;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::writer::{MakeWriter, OptionalWriter};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, reload};

static LEVEL_HANDLE: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();
static LOG_FILE: OnceLock<File> = OnceLock::new();

/// `LEVEL target: message fields`, optionally led by a local timestamp.
struct LineFormat {
    timestamps: bool,
}

fn level_color(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "\x1b[31m",
        Level::WARN => "\x1b[33m",
        Level::INFO => "\x1b[32m",
        Level::DEBUG | Level::TRACE => "\x1b[2m",
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        if self.timestamps {
            write!(writer, "{} ", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))?;
        }
        if writer.has_ansi_escapes() {
            write!(writer, "{}{}\x1b[0m ", level_color(meta.level()), meta.level())?;
        } else {
            write!(writer, "{} ", meta.level())?;
        }
        write!(writer, "{}: ", meta.target())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Writes to [`LOG_FILE`] once it is set, and nowhere before that.
struct LogFile;

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = OptionalWriter<&'static File>;

    fn make_writer(&'a self) -> Self::Writer {
        match LOG_FILE.get() {
            Some(file) => OptionalWriter::some(file),
            None => OptionalWriter::none(),
        }
    }
}

fn parse_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).map_err(|e| anyhow!("invalid log level '{directives}': {e}"))
}

/// Installs the global subscriber. Call once, before anything logs.
///
/// `RUST_LOG` wins over `default_level` when it is set.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let (filter, handle) = reload::Layer::new(filter);

    let stderr = tracing_subscriber::fmt::layer()
        .event_format(LineFormat { timestamps: false })
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);
    let file = tracing_subscriber::fmt::layer()
        .event_format(LineFormat { timestamps: true })
        .with_ansi(false)
        .with_writer(LogFile);

    if tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(file)
        .try_init()
        .is_ok()
    {
        let _ = LEVEL_HANDLE.set(handle);
    }
}

/// Replaces the active filter. Takes a bare level such as `debug` or any
/// `EnvFilter` directive such as `skyline_core=trace`.
pub fn set_log_level(directives: &str) -> Result<()> {
    let filter = parse_filter(directives)?;
    LEVEL_HANDLE
        .get()
        .ok_or_else(|| anyhow!("logging not yet initialized"))?
        .reload(filter)
        .context("reloading log filter")
}

/// Starts appending log lines to `path`. Only the first call takes effect.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;
    LOG_FILE
        .set(file)
        .map_err(|_| anyhow!("a log file is already attached"))
}

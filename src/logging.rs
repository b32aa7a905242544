//! Diagnostics on standard error.
//!
//! Events are printed as `typelist: [WARNING] <message>`, one per line.

use std::fmt;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Event format with a program-name and severity prefix.
struct Diagnostics;

impl<S, N> FormatEvent<S, N> for Diagnostics
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
        let tag = match *event.metadata().level() {
            Level::ERROR => "[ERROR]",
            Level::WARN => "[WARNING]",
            Level::INFO => "[INFO]",
            Level::DEBUG => "[DEBUG]",
            Level::TRACE => "[TRACE]",
        };
        write!(writer, "{}: {} ", env!("CARGO_PKG_NAME"), tag)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the stderr subscriber.
///
/// The filter is read from `RUST_LOG` and defaults to warnings and errors.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(filter)
        .event_format(Diagnostics)
        .init();
}

//! Log output for the `tsv-fixtures` binary.
//!
//! The filter is read from the `TSV_FIXTURES_LOG` environment variable using
//! [`EnvFilter`] syntax. The last bare level in that variable (e.g. `debug` in
//! `tsv_fixtures=trace,debug`) also decides how verbose each line is.
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::field::RecordFields;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, SubscriberBuilder};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "TSV_FIXTURES_LOG";
const INDENT: &str = "    ";

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: BTreeMap<&'static str, String>,
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let value = format!("{:?}", value);
        if field.name() == "message" && self.message.is_none() {
            self.message = Some(value);
        } else {
            self.fields.insert(field.name(), value);
        }
    }
}

/// Event and field formatter.
///
/// At `INFO` and quieter, informational events print only their message and any
/// fields as `key=value`. At `DEBUG` and `TRACE` every line is prefixed with its level
/// and target and fields are listed in an indented `where` block.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    max_level: Level,
}

impl Formatter {
    fn is_terse(self) -> bool {
        self.max_level <= Level::INFO
    }
}

impl<'writer> FormatFields<'writer> for Formatter {
    fn format_fields<R: RecordFields>(&self, mut writer: Writer<'writer>, fields: R) -> fmt::Result {
        let mut collector = FieldCollector::default();
        fields.record(&mut collector);

        if let Some(message) = &collector.message {
            write!(writer, "{}", message)?;
        }
        if collector.fields.is_empty() {
            return Ok(());
        }

        if self.is_terse() {
            if collector.message.is_some() {
                write!(writer, ": ")?;
            }
            let pairs = collector
                .fields
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>();
            write!(writer, "{}", pairs.join(", "))
        } else {
            let width = collector.fields.keys().map(|name| name.len()).max().unwrap_or(0);
            write!(writer, "\n{}where", INDENT)?;
            for (i, (name, value)) in collector.fields.iter().enumerate() {
                if i > 0 {
                    write!(writer, "\n{}     ", INDENT)?;
                }
                write!(writer, " {:>width$} = {}", name, value, width = width)?;
            }
            Ok(())
        }
    }
}

impl<S, N> FormatEvent<S, N> for Formatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let metadata = event.metadata();

        if !self.is_terse() || metadata.level() != &Level::INFO {
            write!(writer, "{} {}: ", metadata.level(), metadata.target())?;
        }
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)?;

        if self.max_level == Level::TRACE {
            if let Some(scope) = ctx.event_scope() {
                for span in scope.from_root() {
                    writeln!(writer, "{}in {}", INDENT, span.name())?;
                }
            }
        }
        Ok(())
    }
}

fn default_level() -> Level {
    if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// The last entry of `filter` that is only a level, if any.
fn level_from_filter(filter: &str) -> Option<Level> {
    filter
        .split(',')
        .map(str::trim)
        .rev()
        .map(Level::from_str)
        .find_map(Result::ok)
}

fn builder(max_level: Level, filter: EnvFilter) -> SubscriberBuilder<Formatter, Formatter, EnvFilter> {
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .event_format(Formatter { max_level })
        .fmt_fields(Formatter { max_level })
}

/// A subscriber builder that logs at `max_level` and below, ignoring the environment.
///
/// The writer can still be replaced with [`SubscriberBuilder::with_writer`].
#[must_use]
pub fn subscriber_builder(max_level: Level) -> SubscriberBuilder<Formatter, Formatter, EnvFilter> {
    builder(max_level, EnvFilter::default().add_directive(max_level.into()))
}

/// The subscriber used by the binary, configured from [`LOG_ENV`].
#[must_use]
pub fn get_subscriber() -> impl Subscriber {
    let env_str = std::env::var(LOG_ENV).unwrap_or_default();
    let max_level = level_from_filter(&env_str).unwrap_or_else(default_level);
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::default().add_directive(max_level.into()));
    builder(max_level, filter).finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_filter_takes_last_bare_level() {
        assert_eq!(level_from_filter("tsv_fixtures=trace,warn"), Some(Level::WARN));
        assert_eq!(level_from_filter("debug, tsv_fixtures=info"), Some(Level::DEBUG));
        assert_eq!(level_from_filter("info,error"), Some(Level::ERROR));
    }

    #[test]
    fn test_level_from_filter_without_level() {
        assert_eq!(level_from_filter(""), None);
        assert_eq!(level_from_filter("tsv_fixtures=trace"), None);
    }

    #[test]
    fn test_terse_levels() {
        assert!(Formatter { max_level: Level::INFO }.is_terse());
        assert!(Formatter { max_level: Level::WARN }.is_terse());
        assert!(!Formatter { max_level: Level::DEBUG }.is_terse());
        assert!(!Formatter { max_level: Level::TRACE }.is_terse());
    }
}

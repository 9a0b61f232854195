//! Process-wide log verbosity, adjustable at runtime with `-log=<Level>`.

use crate::names::eq_ignore_case;
use serde::Deserialize;
use std::cell::Cell;
use std::fmt;
use std::str::FromStr;
use tracing::{Level, Metadata};
use tracing_subscriber::filter::{filter_fn, FilterFn, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt as tracing_fmt, reload, Registry};

/// Field that marks an error event as critical, e.g.
/// `tracing::error!(critical = true, "...")`.
pub const CRITICAL_FIELD: &str = "critical";

type ThresholdFn = Box<dyn Fn(&Metadata<'_>) -> bool + Send + Sync>;
type Threshold = FilterFn<ThresholdFn>;

/// Severity threshold, most severe first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum LogLevel {
    Critical,
    #[default]
    Error,
    Warning,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Critical,
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Critical => "Critical",
            LogLevel::Error => "Error",
            LogLevel::Warning => "Warning",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Most verbose tracing level this threshold lets through. tracing has no level
    /// above ERROR, so Critical shares it and narrows further in `enables`.
    pub fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Critical | LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }

    /// Whether an event or span passes this threshold. At Critical only ERROR
    /// events carrying a `critical` field get through.
    pub fn enables(self, metadata: &Metadata<'_>) -> bool {
        match self {
            LogLevel::Critical => {
                *metadata.level() == Level::ERROR
                    && metadata.fields().field(CRITICAL_FIELD).is_some()
            }
            _ => *metadata.level() <= self.to_filter(),
        }
    }

    fn threshold(self) -> Threshold {
        filter_fn(Box::new(move |metadata: &Metadata<'_>| self.enables(metadata)) as ThresholdFn)
    }

    /// Comma-separated member names, for "can be one of" messages.
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(|level| level.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid log level")]
pub struct InvalidLogLevel(pub String);

impl FromStr for LogLevel {
    type Err = InvalidLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| eq_ignore_case(level.as_str(), s.trim()))
            .ok_or_else(|| InvalidLogLevel(s.to_string()))
    }
}

impl TryFrom<String> for LogLevel {
    type Error = InvalidLogLevel;

    fn try_from(value: String) -> Result<Self, InvalidLogLevel> {
        value.parse()
    }
}

/// Something that owns the live log threshold.
pub trait LevelControl {
    fn level(&self) -> LogLevel;
    fn set_level(&self, level: LogLevel) -> anyhow::Result<()>;
}

/// Handle to the installed subscriber's reloadable level filter.
pub struct LogHandle {
    handle: reload::Handle<Threshold, Registry>,
    current: Cell<LogLevel>,
}

impl LevelControl for LogHandle {
    fn level(&self) -> LogLevel {
        self.current.get()
    }

    fn set_level(&self, level: LogLevel) -> anyhow::Result<()> {
        self.handle.reload(level.threshold())?;
        self.current.set(level);
        Ok(())
    }
}

/// Install the global subscriber: plain fmt lines on stderr, filtered by `level`.
pub fn init(level: LogLevel) -> Result<LogHandle, TryInitError> {
    let (filter, handle) = reload::Layer::new(level.threshold());
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_fmt::layer()
                .without_time()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()?;

    Ok(LogHandle {
        handle,
        current: Cell::new(level),
    })
}

/// In-memory level holder for callers that do not install a subscriber.
#[derive(Debug, Default)]
pub struct StaticLevel(Cell<LogLevel>);

impl StaticLevel {
    pub fn new(level: LogLevel) -> Self {
        Self(Cell::new(level))
    }
}

impl LevelControl for StaticLevel {
    fn level(&self) -> LogLevel {
        self.0.get()
    }

    fn set_level(&self, level: LogLevel) -> anyhow::Result<()> {
        self.0.set(level);
        Ok(())
    }
}

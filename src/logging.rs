//! In-memory structured log fan-out. Records are kept in a process-wide
//! buffer and dispatched to level-filtered subscribers; records at or above
//! the console level are also forwarded to the `log` facade, so whatever
//! logger the host application installed sees them.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use lazy_static::lazy_static;

use crate::func;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Record {
    pub module: String,
    pub level: Level,
    /// Milliseconds since the unix epoch.
    pub time: u64,
    pub message: String,
    pub error: Option<String>,
}

type Handler = Arc<dyn Fn(&Record) + Send + Sync>;

struct Subscription {
    id: u64,
    min_level: Level,
    handler: Handler,
}

struct Registry {
    console_level: Level,
    records: Vec<Record>,
    subscriptions: Vec<Subscription>,
    next_subscription: u64,
}

lazy_static! {
    static ref REGISTRY: Mutex<Registry> = Mutex::new(Registry {
        console_level: Level::Warn,
        records: Vec::new(),
        subscriptions: Vec::new(),
        next_subscription: 0,
    });
}

fn registry() -> MutexGuard<'static, Registry> {
    REGISTRY.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Append a record to the buffer and fan it out. A subscription at level L
/// receives every record at L and above. Handlers run protected; a panicking
/// handler is reported through the `log` facade and the rest still run.
pub fn push(record: Record) {
    let (handlers, console) = {
        let mut registry = registry();
        registry.records.push(record.clone());
        let handlers: Vec<Handler> = registry
            .subscriptions
            .iter()
            .filter(|subscription| subscription.min_level <= record.level)
            .map(|subscription| subscription.handler.clone())
            .collect();
        (handlers, record.level >= registry.console_level)
    };
    for handler in handlers {
        if let Err(err) = func::run(|| handler(&record)) {
            log::warn!("log handler panicked: {}", err.message());
        }
    }
    if console {
        let level = match record.level {
            Level::Debug => log::Level::Debug,
            Level::Info => log::Level::Info,
            Level::Warn => log::Level::Warn,
            Level::Error | Level::Fatal => log::Level::Error,
        };
        let target = record.module.as_str();
        match &record.error {
            Some(err) => log::log!(target: target, level, "{} ({})", record.message, err),
            None => log::log!(target: target, level, "{}", record.message),
        }
    }
}

pub fn subscribe(
    min_level: Level,
    handler: impl Fn(&Record) + Send + Sync + 'static,
) -> SubscriptionId {
    let mut registry = registry();
    let id = registry.next_subscription;
    registry.next_subscription += 1;
    registry.subscriptions.push(Subscription {
        id,
        min_level,
        handler: Arc::new(handler),
    });
    SubscriptionId(id)
}

pub fn unsubscribe(id: SubscriptionId) {
    registry()
        .subscriptions
        .retain(|subscription| subscription.id != id.0);
}

/// Snapshot of every record pushed so far.
pub fn records() -> Vec<Record> {
    registry().records.clone()
}

pub fn console_level() -> Level {
    registry().console_level
}

/// Minimum level forwarded to the `log` facade. Defaults to [`Level::Warn`].
pub fn set_console_level(level: Level) {
    registry().console_level = level;
}

/// A named handle that stamps records with a module name before pushing
/// them into the global registry.
#[derive(Clone, Debug)]
pub struct Logger {
    module: String,
}

impl Logger {
    pub fn new(module: impl Into<String>) -> Self {
        Logger {
            module: module.into(),
        }
    }

    fn push(&self, level: Level, message: String, error: Option<String>) {
        push(Record {
            module: self.module.clone(),
            level,
            time: epoch_millis(),
            message,
            error,
        });
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.push(Level::Debug, message.into(), None);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(Level::Info, message.into(), None);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.push(Level::Warn, message.into(), None);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Level::Error, message.into(), None);
    }

    pub fn fatal(&self, message: impl Into<String>) {
        self.push(Level::Fatal, message.into(), None);
    }

    pub fn warn_with(&self, message: impl Into<String>, error: &dyn std::error::Error) {
        self.push(Level::Warn, message.into(), Some(error.to_string()));
    }

    pub fn error_with(&self, message: impl Into<String>, error: &dyn std::error::Error) {
        self.push(Level::Error, message.into(), Some(error.to_string()));
    }

    pub fn fatal_with(&self, message: impl Into<String>, error: &dyn std::error::Error) {
        self.push(Level::Fatal, message.into(), Some(error.to_string()));
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

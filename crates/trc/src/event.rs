/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::*;
use std::fmt::Display;

impl EventType {
    #[inline(always)]
    pub fn into_err(self) -> Error {
        Error(Box::new(Event::new(self)))
    }

    #[inline(always)]
    pub fn ctx(self, key: Key, value: impl Into<Value>) -> Error {
        self.into_err().ctx(key, value)
    }

    #[inline(always)]
    pub fn reason(self, error: impl Display) -> Error {
        self.into_err().reason(error)
    }

    #[inline(always)]
    pub fn details(self, details: impl Into<Value>) -> Error {
        self.into_err().details(details)
    }

    #[inline(always)]
    pub fn caused_by(self, location: &'static str) -> Error {
        self.into_err().caused_by(location)
    }

    pub fn level(&self) -> Level {
        match self {
            EventType::Server(event) => match event {
                ServerEvent::StartupError | ServerEvent::ThreadError => Level::Error,
            },
            EventType::Store(event) => match event {
                StoreEvent::DataWrite | StoreEvent::DataIterate => Level::Trace,
                StoreEvent::StoreOpened | StoreEvent::StoreClosed => Level::Info,
                StoreEvent::DataCorruption
                | StoreEvent::NotConfigured
                | StoreEvent::PoolError
                | StoreEvent::SqliteError
                | StoreEvent::PostgresqlError
                | StoreEvent::RocksdbError => Level::Error,
            },
            EventType::EventBus(event) => match event {
                EventBusEvent::DeadLetterStored => Level::Info,
                EventBusEvent::DeadLetterRemoved
                | EventBusEvent::DeadLetterGroupRemoved
                | EventBusEvent::DeadLetterNotFound => Level::Debug,
                EventBusEvent::InvalidGroup
                | EventBusEvent::InvalidInsertionId
                | EventBusEvent::SerializeFailed
                | EventBusEvent::DeserializeFailed
                | EventBusEvent::UnknownEventType
                | EventBusEvent::HealthDegraded => Level::Warn,
            },
            EventType::Config(event) => match event {
                ConfigEvent::BuildWarning => Level::Warn,
                ConfigEvent::ParseError | ConfigEvent::BuildError => Level::Error,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EventType::Server(event) => match event {
                ServerEvent::StartupError => "server.startup-error",
                ServerEvent::ThreadError => "server.thread-error",
            },
            EventType::Store(event) => match event {
                StoreEvent::DataCorruption => "store.data-corruption",
                StoreEvent::NotConfigured => "store.not-configured",
                StoreEvent::PoolError => "store.pool-error",
                StoreEvent::SqliteError => "store.sqlite-error",
                StoreEvent::PostgresqlError => "store.postgresql-error",
                StoreEvent::RocksdbError => "store.rocksdb-error",
                StoreEvent::DataWrite => "store.data-write",
                StoreEvent::DataIterate => "store.data-iterate",
                StoreEvent::StoreOpened => "store.opened",
                StoreEvent::StoreClosed => "store.closed",
            },
            EventType::EventBus(event) => match event {
                EventBusEvent::DeadLetterStored => "event-bus.dead-letter-stored",
                EventBusEvent::DeadLetterRemoved => "event-bus.dead-letter-removed",
                EventBusEvent::DeadLetterGroupRemoved => "event-bus.dead-letter-group-removed",
                EventBusEvent::DeadLetterNotFound => "event-bus.dead-letter-not-found",
                EventBusEvent::InvalidGroup => "event-bus.invalid-group",
                EventBusEvent::InvalidInsertionId => "event-bus.invalid-insertion-id",
                EventBusEvent::SerializeFailed => "event-bus.serialize-failed",
                EventBusEvent::DeserializeFailed => "event-bus.deserialize-failed",
                EventBusEvent::UnknownEventType => "event-bus.unknown-event-type",
                EventBusEvent::HealthDegraded => "event-bus.health-degraded",
            },
            EventType::Config(event) => match event {
                ConfigEvent::ParseError => "config.parse-error",
                ConfigEvent::BuildError => "config.build-error",
                ConfigEvent::BuildWarning => "config.build-warning",
            },
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EventType::Server(event) => match event {
                ServerEvent::StartupError => "Failed to start",
                ServerEvent::ThreadError => "Worker thread error",
            },
            EventType::Store(event) => match event {
                StoreEvent::DataCorruption => "Data corruption detected",
                StoreEvent::NotConfigured => "Store not configured",
                StoreEvent::PoolError => "Connection pool error",
                StoreEvent::SqliteError => "SQLite error",
                StoreEvent::PostgresqlError => "PostgreSQL error",
                StoreEvent::RocksdbError => "RocksDB error",
                StoreEvent::DataWrite => "Write batch operation",
                StoreEvent::DataIterate => "Data store iteration operation",
                StoreEvent::StoreOpened => "Store opened",
                StoreEvent::StoreClosed => "Store closed",
            },
            EventType::EventBus(event) => match event {
                EventBusEvent::DeadLetterStored => "Failed event delivery recorded",
                EventBusEvent::DeadLetterRemoved => "Failed event delivery acknowledged",
                EventBusEvent::DeadLetterGroupRemoved => "All failed deliveries of a group removed",
                EventBusEvent::DeadLetterNotFound => "Failed event delivery not found",
                EventBusEvent::InvalidGroup => "Invalid listener group name",
                EventBusEvent::InvalidInsertionId => "Invalid insertion id",
                EventBusEvent::SerializeFailed => "Failed to serialize event",
                EventBusEvent::DeserializeFailed => "Failed to deserialize stored event",
                EventBusEvent::UnknownEventType => "Stored event has an unknown type",
                EventBusEvent::HealthDegraded => "Dead letters contain failed events",
            },
            EventType::Config(event) => match event {
                ConfigEvent::ParseError => "Configuration parse error",
                ConfigEvent::BuildError => "Configuration build error",
                ConfigEvent::BuildWarning => "Configuration build warning",
            },
        }
    }
}

impl<T> Event<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            keys: Vec::with_capacity(5),
        }
    }

    pub fn value(&self, key: Key) -> Option<&Value> {
        self.keys
            .iter()
            .find_map(|(k, v)| if *k == key { Some(v) } else { None })
    }

    pub fn value_as_str(&self, key: Key) -> Option<&str> {
        self.value(key).and_then(|v| v.as_str())
    }
}

impl Error {
    pub fn new(inner: EventType) -> Self {
        Error(Box::new(Event::new(inner)))
    }

    #[inline(always)]
    pub fn ctx(mut self, key: Key, value: impl Into<Value>) -> Self {
        self.0.keys.push((key, value.into()));
        self
    }

    #[inline(always)]
    pub fn reason(self, error: impl Display) -> Self {
        self.ctx(Key::Reason, error.to_string())
    }

    #[inline(always)]
    pub fn details(self, details: impl Into<Value>) -> Self {
        self.ctx(Key::Details, details)
    }

    #[inline(always)]
    pub fn code(self, code: impl Into<Value>) -> Self {
        self.ctx(Key::Code, code)
    }

    #[inline(always)]
    pub fn caused_by(self, location: &'static str) -> Self {
        self.ctx(Key::CausedBy, location)
    }

    #[inline(always)]
    pub fn event_type(&self) -> EventType {
        self.0.inner
    }

    #[inline(always)]
    pub fn matches(&self, inner: EventType) -> bool {
        self.0.inner == inner
    }

    pub fn value(&self, key: Key) -> Option<&Value> {
        self.0.value(key)
    }

    pub fn value_as_str(&self, key: Key) -> Option<&str> {
        self.0.value_as_str(key)
    }

    pub fn keys(&self) -> &[(Key, Value)] {
        &self.0.keys
    }

    pub fn corrupted(key: &'static str) -> Self {
        StoreEvent::DataCorruption
            .into_err()
            .details(key)
            .caused_by(crate::location!())
    }
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Disable => "disable",
        }
    }

    pub fn parse(level: &str) -> Option<Self> {
        match level {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "disable" | "off" => Some(Level::Disable),
            _ => None,
        }
    }
}

impl Key {
    pub fn name(&self) -> &'static str {
        match self {
            Key::CausedBy => "causedBy",
            Key::Code => "code",
            Key::Collection => "collection",
            Key::Details => "details",
            Key::Elapsed => "elapsed",
            Key::Group => "group",
            Key::Id => "id",
            Key::Key => "key",
            Key::Reason => "reason",
            Key::Result => "result",
            Key::Size => "size",
            Key::Total => "total",
            Key::Type => "type",
            Key::Value => "value",
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.inner.description())?;
        for (key, value) in &self.0.keys {
            write!(f, ", {} = ", key.name())?;
            Display::fmt(value, f)?;
        }
        Ok(())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Static(v) => f.write_str(v),
            Value::String(v) => f.write_str(v),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Duration(v) => write!(f, "{v}ms"),
            Value::Timestamp(v) => write!(f, "{v}"),
            Value::Bytes(v) => write!(f, "{}", String::from_utf8_lossy(v)),
            Value::Event(v) => write!(f, "({v})"),
            Value::Array(values) => {
                f.write_str("[")?;
                for (pos, value) in values.iter().enumerate() {
                    if pos > 0 {
                        f.write_str(", ")?;
                    }
                    Display::fmt(value, f)?;
                }
                f.write_str("]")
            }
            Value::None => f.write_str("(null)"),
        }
    }
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Static(v) => Some(v),
            Value::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

}

impl std::error::Error for Error {}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.0.inner == other.0.inner
    }
}

impl Eq for Error {}

/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod collector;
pub mod conv;
pub mod event;
pub mod serializers;
pub mod subscriber;

use compact_str::CompactString;
use std::fmt::Debug;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
#[repr(transparent)]
pub struct Error(Box<Event<EventType>>);

#[derive(Debug, Clone)]
pub struct Event<T> {
    pub inner: T,
    pub keys: Vec<(Key, Value)>,
}

#[derive(Debug, Clone, Default)]
pub enum Value {
    Static(&'static str),
    String(CompactString),
    UInt(u64),
    Int(i64),
    Float(f64),
    Bool(bool),
    Duration(u64),
    Timestamp(u64),
    Bytes(Vec<u8>),
    Event(Error),
    Array(Vec<Value>),
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Disable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    CausedBy,
    Code,
    Collection,
    Details,
    Elapsed,
    Group,
    Id,
    Key,
    Reason,
    Result,
    Size,
    Total,
    Type,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Server(ServerEvent),
    Store(StoreEvent),
    EventBus(EventBusEvent),
    Config(ConfigEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerEvent {
    StartupError,
    ThreadError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreEvent {
    // Errors
    DataCorruption,
    NotConfigured,
    PoolError,
    SqliteError,
    PostgresqlError,
    RocksdbError,

    // Traces
    DataWrite,
    DataIterate,
    StoreOpened,
    StoreClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventBusEvent {
    DeadLetterStored,
    DeadLetterRemoved,
    DeadLetterGroupRemoved,
    DeadLetterNotFound,
    InvalidGroup,
    InvalidInsertionId,
    SerializeFailed,
    DeserializeFailed,
    UnknownEventType,
    HealthDegraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigEvent {
    ParseError,
    BuildError,
    BuildWarning,
}

pub trait AddContext<T> {
    fn caused_by(self, location: &'static str) -> Result<T>;

    fn add_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce(Error) -> Error;
}

impl<T> AddContext<T> for Result<T> {
    #[inline(always)]
    fn caused_by(self, location: &'static str) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(err.ctx(Key::CausedBy, location)),
        }
    }

    #[inline(always)]
    fn add_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce(Error) -> Error,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(f(err)),
        }
    }
}

#[macro_export]
macro_rules! location {
    () => {{ concat!(file!(), ":", line!()) }};
}

#[macro_export]
macro_rules! bail {
    ($err:expr $(,)?) => {
        return Err($err);
    };
}

/// Emits an event to every subscriber interested in its level.
///
/// ```ignore
/// trc::event!(
///     Store(StoreEvent::DataWrite),
///     Elapsed = start_time.elapsed(),
///     Total = ops,
/// );
/// ```
#[macro_export]
macro_rules! event {
    ($event:ident($($param:tt)*) $(, $key:ident = $value:expr)* $(,)?) => {{
        let et = $crate::EventType::$event($($param)*);
        if $crate::collector::Collector::is_enabled(et) {
            $crate::Event::with_keys(
                et,
                vec![$(($crate::Key::$key, $crate::Value::from($value)),)*],
            )
            .send();
        }
    }};
}

impl Event<EventType> {
    pub fn with_keys(inner: EventType, keys: Vec<(Key, Value)>) -> Self {
        Self { inner, keys }
    }

    pub fn send(self) {
        collector::Collector::record(self);
    }
}

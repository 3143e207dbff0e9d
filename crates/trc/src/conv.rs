/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::*;
use compact_str::{CompactString, ToCompactString};
use std::{fmt::Display, time::Duration};

macro_rules! impl_event_type {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for EventType {
                #[inline(always)]
                fn from(event: $ty) -> Self {
                    EventType::$variant(event)
                }
            }

            impl From<$ty> for Error {
                #[inline(always)]
                fn from(event: $ty) -> Self {
                    Error::new(EventType::$variant(event))
                }
            }

            impl $ty {
                #[inline(always)]
                pub fn into_err(self) -> Error {
                    Error::new(EventType::$variant(self))
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
            }
        )*
    };
}

impl_event_type!(
    ServerEvent => Server,
    StoreEvent => Store,
    EventBusEvent => EventBus,
    ConfigEvent => Config,
);

impl From<EventType> for Error {
    fn from(event: EventType) -> Self {
        Error::new(event)
    }
}

impl From<&'static str> for Value {
    fn from(value: &'static str) -> Self {
        Self::Static(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value.into())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::String(value.to_compact_string())
    }
}

impl From<CompactString> for Value {
    fn from(value: CompactString) -> Self {
        Self::String(value)
    }
}

impl From<&CompactString> for Value {
    fn from(value: &CompactString) -> Self {
        Self::String(value.clone())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::UInt(value as u64)
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Self::UInt(value as u64)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Self::UInt(value as u64)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Self::UInt(value as u64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Duration> for Value {
    fn from(value: Duration) -> Self {
        Self::Duration(value.as_millis() as u64)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<Error> for Value {
    fn from(value: Error) -> Self {
        Self::Event(value)
    }
}

impl<T> From<&Result<T>> for Value {
    fn from(value: &Result<T>) -> Self {
        match value {
            Ok(_) => Self::Static("Ok"),
            Err(err) => Self::Event(err.clone()),
        }
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Self::None,
        }
    }
}

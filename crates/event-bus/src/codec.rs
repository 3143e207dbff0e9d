/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use ahash::AHashMap;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::marker::PhantomData;
use trc::EventBusEvent;

/// Text boundary between events and their persisted form.
pub trait EventSerializer: Send + Sync + 'static {
    type Event: Send + Sync + 'static;

    fn serialize(&self, event: &Self::Event) -> trc::Result<String>;

    /// Returns `None` for any payload that cannot be turned back into an
    /// event, never an error.
    fn deserialize(&self, value: &str) -> Option<Self::Event>;
}

type Decoder<E> = Box<dyn Fn(Value) -> serde_json::Result<E> + Send + Sync>;

/// JSON codec writing every event as `{"<kind>": <payload>}`.
///
/// Unit variants are written as `{"<kind>": null}`; a bare `"<kind>"` string
/// is read the same way. Only the kinds registered on the reading side are
/// decoded, anything else reads back as `None`.
pub struct JsonEventSerializer<E> {
    decoders: AHashMap<&'static str, Decoder<E>>,
    _event: PhantomData<fn() -> E>,
}

impl<E> Default for JsonEventSerializer<E> {
    fn default() -> Self {
        Self {
            decoders: AHashMap::new(),
            _event: PhantomData,
        }
    }
}

impl<E: 'static> JsonEventSerializer<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decoder(
        mut self,
        kind: &'static str,
        decoder: impl Fn(Value) -> serde_json::Result<E> + Send + Sync + 'static,
    ) -> Self {
        self.decoders.insert(kind, Box::new(decoder));
        self
    }

    /// Decodes the payload of `kind` as `T` and converts it into the event.
    pub fn with_type<T>(self, kind: &'static str) -> Self
    where
        T: DeserializeOwned + Into<E> + 'static,
    {
        self.with_decoder(kind, |payload| {
            serde_json::from_value::<T>(payload).map(Into::into)
        })
    }

    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.decoders.keys().copied()
    }
}

impl<E: DeserializeOwned + 'static> JsonEventSerializer<E> {
    /// Decodes `kind` through the event's own externally tagged
    /// `Deserialize` implementation, unit variants included.
    pub fn with_variant(self, kind: &'static str) -> Self {
        self.with_decoder(kind, move |payload| {
            let unit = payload.is_null();
            let mut object = serde_json::Map::with_capacity(1);
            object.insert(kind.to_string(), payload);
            match serde_json::from_value(Value::Object(object)) {
                Err(_) if unit => serde_json::from_value(Value::String(kind.to_string())),
                result => result,
            }
        })
    }

    pub fn with_variants(self, kinds: impl IntoIterator<Item = &'static str>) -> Self {
        kinds
            .into_iter()
            .fold(self, |serializer, kind| serializer.with_variant(kind))
    }
}

impl<E> EventSerializer for JsonEventSerializer<E>
where
    E: Serialize + Send + Sync + 'static,
{
    type Event = E;

    fn serialize(&self, event: &E) -> trc::Result<String> {
        let value = serde_json::to_value(event).map_err(|err| {
            EventBusEvent::SerializeFailed
                .reason(err)
                .caused_by(trc::location!())
        })?;

        match value {
            Value::Object(object) if object.len() == 1 => Ok(Value::Object(object).to_string()),
            Value::String(kind) => {
                let mut object = serde_json::Map::with_capacity(1);
                object.insert(kind, Value::Null);
                Ok(Value::Object(object).to_string())
            }
            _ => Err(EventBusEvent::SerializeFailed
                .into_err()
                .details("Event must serialize to a variant name or a single member object")
                .caused_by(trc::location!())),
        }
    }

    fn deserialize(&self, value: &str) -> Option<E> {
        let (kind, payload) = match serde_json::from_str::<Value>(value) {
            Ok(Value::Object(object)) if object.len() == 1 => object.into_iter().next()?,
            Ok(Value::String(kind)) => (kind, Value::Null),
            Ok(_) => {
                trc::event!(
                    EventBus(EventBusEvent::DeserializeFailed),
                    Details = "Expected a variant name or an object with a single member",
                    Size = value.len(),
                );
                return None;
            }
            Err(err) => {
                trc::event!(
                    EventBus(EventBusEvent::DeserializeFailed),
                    Reason = err.to_string(),
                    Size = value.len(),
                );
                return None;
            }
        };

        let Some(decoder) = self.decoders.get(kind.as_str()) else {
            trc::event!(EventBus(EventBusEvent::UnknownEventType), Type = kind);
            return None;
        };

        match decoder(payload) {
            Ok(event) => Some(event),
            Err(err) => {
                trc::event!(
                    EventBus(EventBusEvent::DeserializeFailed),
                    Type = kind,
                    Reason = err.to_string(),
                );
                None
            }
        }
    }
}

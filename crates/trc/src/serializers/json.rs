/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::{Error, Event, EventType, Key, Value};
use serde::{
    Serialize, Serializer,
    ser::{SerializeMap, SerializeSeq},
};

#[derive(Default)]
pub struct JsonSerializer {
    pretty: bool,
}

struct JsonEvent<'x>(&'x EventType, &'x [(Key, Value)]);
struct JsonKeys<'x>(&'x [(Key, Value)]);
struct JsonValue<'x>(&'x Value);
struct JsonArray<'x>(&'x [Value]);

impl JsonSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn serialize(&self, event: &Event<EventType>) -> String {
        let event = JsonEvent(&event.inner, &event.keys);
        if self.pretty {
            serde_json::to_string_pretty(&event)
        } else {
            serde_json::to_string(&event)
        }
        .unwrap_or_default()
    }
}

impl Serialize for JsonEvent<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", self.0.name())?;
        map.serialize_entry("level", self.0.level().as_str())?;
        map.serialize_entry("data", &JsonKeys(self.1))?;
        map.end()
    }
}

impl Serialize for JsonKeys<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key.name(), &JsonValue(value))?;
        }
        map.end()
    }
}

impl Serialize for JsonValue<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            Value::Static(v) => v.serialize(serializer),
            Value::String(v) => v.as_str().serialize(serializer),
            Value::UInt(v) | Value::Duration(v) | Value::Timestamp(v) => v.serialize(serializer),
            Value::Int(v) => v.serialize(serializer),
            Value::Float(v) => v.serialize(serializer),
            Value::Bool(v) => v.serialize(serializer),
            Value::Bytes(v) => String::from_utf8_lossy(v).serialize(serializer),
            Value::Event(err) => JsonError(err).serialize(serializer),
            Value::Array(values) => JsonArray(values).serialize(serializer),
            Value::None => serializer.serialize_none(),
        }
    }
}

struct JsonError<'x>(&'x Error);

impl Serialize for JsonError<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        JsonEvent(&self.0.event_type(), self.0.keys()).serialize(serializer)
    }
}

impl Serialize for JsonArray<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for value in self.0 {
            seq.serialize_element(&JsonValue(value))?;
        }
        seq.end()
    }
}

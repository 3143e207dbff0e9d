/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::{
    Event, EventType, Level,
    serializers::{json::JsonSerializer, text::TextSerializer},
};
use ahash::AHashSet;
use parking_lot::Mutex;
use std::io::Write;

pub trait Subscriber: Send + Sync {
    fn level(&self) -> Level;

    fn is_interested(&self, _event: EventType) -> bool {
        true
    }

    fn on_event(&self, event: &Event<EventType>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracerFormat {
    Text,
    Json,
}

pub struct ConsoleTracer {
    pub level: Level,
    pub format: TracerFormat,
    pub ansi: bool,
    pub multiline: bool,
}

impl ConsoleTracer {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            format: TracerFormat::Text,
            ansi: false,
            multiline: false,
        }
    }

    pub fn with_format(mut self, format: TracerFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }
}

impl Subscriber for ConsoleTracer {
    fn level(&self) -> Level {
        self.level
    }

    fn on_event(&self, event: &Event<EventType>) {
        let line = match self.format {
            TracerFormat::Text => TextSerializer::new()
                .with_ansi(self.ansi)
                .with_multiline(self.multiline)
                .serialize(event),
            TracerFormat::Json => JsonSerializer::new().serialize(event),
        };

        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{line}");
    }
}

/// Keeps every received event in memory, mostly useful to assert on
/// emitted events.
pub struct EventRecorder {
    level: Level,
    interests: AHashSet<EventType>,
    events: Mutex<Vec<Event<EventType>>>,
}

impl EventRecorder {
    pub fn new(interests: impl IntoIterator<Item = EventType>) -> Self {
        let interests: AHashSet<EventType> = interests.into_iter().collect();
        Self {
            level: interests
                .iter()
                .map(|et| et.level())
                .min()
                .unwrap_or(Level::Disable),
            interests,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn count(&self, event: EventType) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| e.inner == event)
            .count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Subscriber for EventRecorder {
    fn level(&self) -> Level {
        self.level
    }

    fn is_interested(&self, event: EventType) -> bool {
        self.interests.contains(&event)
    }

    fn on_event(&self, event: &Event<EventType>) {
        self.events.lock().push(event.clone());
    }
}

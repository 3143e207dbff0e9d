/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::{Event, EventType, Level, Value};
use std::fmt::Write;

#[derive(Default)]
pub struct TextSerializer {
    ansi: bool,
    multiline: bool,
}

impl TextSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    pub fn with_multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    pub fn serialize(&self, event: &Event<EventType>) -> String {
        let mut buf = String::with_capacity(128);
        let level = event.inner.level();

        if self.ansi {
            let _ = write!(
                buf,
                "\x1b[1m{}{:>5}\x1b[0m ",
                level_color(level),
                level.as_str().to_uppercase()
            );
        } else {
            let _ = write!(buf, "{:>5} ", level.as_str().to_uppercase());
        }

        let _ = write!(
            buf,
            "{} ({})",
            event.inner.description(),
            event.inner.name()
        );

        for (pos, (key, value)) in event.keys.iter().enumerate() {
            if self.multiline {
                buf.push_str("\n\t");
            } else if pos == 0 {
                buf.push(' ');
            } else {
                buf.push_str(", ");
            }
            let _ = write!(buf, "{} = ", key.name());
            self.write_value(&mut buf, value);
        }

        buf
    }

    fn write_value(&self, buf: &mut String, value: &Value) {
        match value {
            Value::Static(v) => {
                let _ = write!(buf, "{v:?}");
            }
            Value::String(v) => {
                let _ = write!(buf, "{:?}", v.as_str());
            }
            Value::Event(err) => {
                buf.push('(');
                let _ = write!(buf, "{}", err.event_type().description());
                for (key, value) in err.keys() {
                    let _ = write!(buf, ", {} = ", key.name());
                    self.write_value(buf, value);
                }
                buf.push(')');
            }
            Value::Array(values) => {
                buf.push('[');
                for (pos, value) in values.iter().enumerate() {
                    if pos > 0 {
                        buf.push_str(", ");
                    }
                    self.write_value(buf, value);
                }
                buf.push(']');
            }
            value => {
                let _ = write!(buf, "{value}");
            }
        }
    }
}

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1b[31m",
        Level::Warn => "\x1b[33m",
        Level::Info => "\x1b[32m",
        Level::Debug => "\x1b[34m",
        Level::Trace | Level::Disable => "\x1b[35m",
    }
}

/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::Config;
use std::sync::Arc;
use trc::{
    Level,
    collector::Collector,
    subscriber::{ConsoleTracer, TracerFormat},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tracer {
    pub id: String,
    pub level: Level,
    pub format: TracerFormat,
    pub ansi: bool,
    pub multiline: bool,
}

#[derive(Debug, Default, Clone)]
pub struct Tracers {
    pub tracers: Vec<Tracer>,
}

impl Tracers {
    pub fn parse(config: &mut Config) -> Self {
        let mut tracers = Vec::new();

        for id in config.sub_keys("tracer", ".type") {
            let prefix = format!("tracer.{id}");
            if !config
                .property_or_default::<bool>((&prefix, "enable"), "true")
                .unwrap_or(true)
            {
                continue;
            }

            match config.value((&prefix, "type")) {
                Some("console" | "stdout" | "stderr") => {}
                Some(other) => {
                    let err = format!("Unsupported tracer type {other:?}");
                    config.new_build_error((&prefix, "type"), err);
                    continue;
                }
                None => continue,
            }

            let format = match config.value((&prefix, "format")).unwrap_or("text") {
                "text" => TracerFormat::Text,
                "json" => TracerFormat::Json,
                other => {
                    let err = format!("Unsupported tracer format {other:?}");
                    config.new_build_error((&prefix, "format"), err);
                    continue;
                }
            };

            tracers.push(Tracer {
                level: config
                    .property_or_default::<Level>((&prefix, "level"), "info")
                    .unwrap_or(Level::Info),
                format,
                ansi: config
                    .property_or_default((&prefix, "ansi"), "false")
                    .unwrap_or(false),
                multiline: config
                    .property_or_default((&prefix, "multiline"), "false")
                    .unwrap_or(false),
                id,
            });
        }

        Tracers { tracers }
    }

    pub fn enable(&self) {
        for tracer in &self.tracers {
            let mut subscriber = ConsoleTracer::new(tracer.level)
                .with_format(tracer.format)
                .with_ansi(tracer.ansi);
            subscriber.multiline = tracer.multiline;
            Collector::register(tracer.id.clone(), Arc::new(subscriber));
        }
    }
}

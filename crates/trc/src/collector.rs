/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::{Event, EventType, Level, subscriber::Subscriber};
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::{
    Arc, LazyLock,
    atomic::{AtomicU8, Ordering},
};

static COLLECTOR: LazyLock<Collector> = LazyLock::new(Collector::default);

/// Process-wide event collector.
///
/// Events are dispatched synchronously to every subscriber whose level
/// admits them. The lowest level among subscribers is cached so that
/// `event!` can skip building events nobody will see.
pub struct Collector {
    subscribers: RwLock<AHashMap<String, Arc<dyn Subscriber>>>,
    min_level: AtomicU8,
}

impl Default for Collector {
    fn default() -> Self {
        Self {
            subscribers: RwLock::new(AHashMap::new()),
            min_level: AtomicU8::new(Level::Disable as u8),
        }
    }
}

impl Collector {
    pub fn register(id: impl Into<String>, subscriber: Arc<dyn Subscriber>) {
        let mut subscribers = COLLECTOR.subscribers.write();
        subscribers.insert(id.into(), subscriber);
        COLLECTOR.update_level(&subscribers);
    }

    #[inline(always)]
    pub fn is_enabled(event: EventType) -> bool {
        event.level() as u8 >= COLLECTOR.min_level.load(Ordering::Relaxed)
            && event.level() != Level::Disable
    }

    pub fn record(event: Event<EventType>) {
        let level = event.inner.level();

        // Subscribers may register others while handling the event
        let subscribers = COLLECTOR
            .subscribers
            .read()
            .values()
            .filter(|subscriber| {
                level >= subscriber.level() && subscriber.is_interested(event.inner)
            })
            .cloned()
            .collect::<Vec<_>>();

        for subscriber in subscribers {
            subscriber.on_event(&event);
        }
    }

    fn update_level(&self, subscribers: &AHashMap<String, Arc<dyn Subscriber>>) {
        let level = subscribers
            .values()
            .map(|s| s.level())
            .min()
            .unwrap_or(Level::Disable);
        self.min_level.store(level as u8, Ordering::Relaxed);
    }
}

/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod concurrent;
pub mod events;

use crate::{AssertConfig, TempDir, open_stores, store_ids};
use event_bus::{EventDeadLetters, JsonEventSerializer};
use events::MailboxEvent;
use futures::TryStreamExt;
use std::sync::{Arc, LazyLock};
use trc::{EventBusEvent, EventType, collector::Collector, subscriber::EventRecorder};
use types::{Group, InsertionId};

pub type DeadLetters = EventDeadLetters<JsonEventSerializer<MailboxEvent>>;

static RECORDER: LazyLock<Arc<EventRecorder>> = LazyLock::new(|| {
    let recorder = Arc::new(EventRecorder::new([
        EventType::EventBus(EventBusEvent::DeadLetterStored),
        EventType::EventBus(EventBusEvent::UnknownEventType),
        EventType::EventBus(EventBusEvent::DeserializeFailed),
    ]));
    Collector::register("dead-letter-recorder", recorder.clone());
    recorder
});

pub fn recorder() -> &'static EventRecorder {
    &RECORDER
}

#[tokio::test(flavor = "multi_thread")]
pub async fn dead_letter_tests() {
    let temp_dir = TempDir::new("dead_letter_tests", true);
    let store_ids = store_ids();
    let (config, stores) = open_stores(&temp_dir, &store_ids).await;

    for store_id in &store_ids {
        let mut config = config.clone();
        config
            .keys
            .insert("event-bus.dead-letter.store".to_string(), store_id.clone());
        let dead_letters = EventDeadLetters::parse(&mut config, &stores, events::serializer())
            .expect("Failed to build dead letters");
        config.assert_no_errors();

        println!("Testing dead letters on store {store_id}...");
        contract::test(&dead_letters).await;
        concurrent::test(&dead_letters).await;

        dead_letters.backing_store().destroy().await;
        dead_letters.backing_store().close().await.unwrap();
    }

    temp_dir.delete();
}

pub fn group(name: &str) -> Group {
    Group::new(name).unwrap()
}

pub fn insertion_id(id: &str) -> InsertionId {
    id.parse().unwrap()
}

pub async fn failed_ids(dead_letters: &DeadLetters, group: &Group) -> Vec<InsertionId> {
    let mut ids = dead_letters
        .failed_ids(group)
        .try_collect::<Vec<_>>()
        .await
        .unwrap();
    ids.sort_unstable();
    ids
}

pub async fn groups_with_failed_events(dead_letters: &DeadLetters) -> Vec<Group> {
    let mut groups = dead_letters
        .groups_with_failed_events()
        .try_collect::<Vec<_>>()
        .await
        .unwrap();
    groups.sort_unstable();
    groups
}

/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{DeadLetters, events::MailboxEvent, failed_ids, group, groups_with_failed_events};
use ahash::AHashMap;
use types::{Group, InsertionId};
use uuid::Uuid;

const THREAD_COUNT: usize = 10;
const OPERATION_COUNT: usize = 50;

pub async fn test(dead_letters: &DeadLetters) {
    println!("Running concurrent store tests...");
    dead_letters.backing_store().destroy().await;
    let stored = store_all(dead_letters).await;
    for (group, mut ids) in stored {
        ids.sort_unstable();
        assert_eq!(ids.len(), OPERATION_COUNT);
        assert_eq!(failed_ids(dead_letters, &group).await, ids);
    }

    println!("Running concurrent remove tests...");
    dead_letters.backing_store().destroy().await;
    let stored = store_all(dead_letters).await;
    let mut handles = Vec::new();
    for (group, ids) in stored {
        let dead_letters = dead_letters.clone();
        handles.push(tokio::spawn(async move {
            for id in ids {
                dead_letters.remove(&group, id).await.unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
    assert_no_failed_events(dead_letters).await;

    println!("Running concurrent group removal tests...");
    dead_letters.backing_store().destroy().await;
    let stored = store_all(dead_letters).await;
    let mut handles = Vec::new();
    for group in stored.into_keys() {
        // Each group is removed by two tasks at once
        for _ in 0..2 {
            let dead_letters = dead_letters.clone();
            let group = group.clone();
            handles.push(tokio::spawn(async move {
                dead_letters.remove_group(&group).await.unwrap();
            }));
        }
    }
    for handle in handles {
        handle.await.unwrap();
    }
    assert_no_failed_events(dead_letters).await;
}

async fn store_all(dead_letters: &DeadLetters) -> AHashMap<Group, Vec<InsertionId>> {
    let mut handles = Vec::with_capacity(THREAD_COUNT);
    for thread in 0..THREAD_COUNT {
        let dead_letters = dead_letters.clone();
        handles.push(tokio::spawn(async move {
            let group = group(&format!("org.apache.james.mailbox.events.Group{thread}"));
            let mut ids = Vec::with_capacity(OPERATION_COUNT);
            for _ in 0..OPERATION_COUNT {
                let event = MailboxEvent::test(&Uuid::new_v4().to_string());
                ids.push(dead_letters.store(&group, &event).await.unwrap());
            }
            (group, ids)
        }));
    }

    let mut stored = AHashMap::with_capacity(THREAD_COUNT);
    for handle in handles {
        let (group, ids) = handle.await.unwrap();
        stored.insert(group, ids);
    }
    stored
}

async fn assert_no_failed_events(dead_letters: &DeadLetters) {
    for thread in 0..THREAD_COUNT {
        let group = group(&format!("org.apache.james.mailbox.events.Group{thread}"));
        assert!(failed_ids(dead_letters, &group).await.is_empty());
    }
    assert!(groups_with_failed_events(dead_letters).await.is_empty());
    assert!(!dead_letters.contain_events().await.unwrap());
}

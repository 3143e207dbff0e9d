/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use store::{
    IterateParams, SUBSPACE_DEAD_LETTER, SUBSPACE_DEAD_LETTER_GROUP, Store,
    write::{AnyClass, AnyKey, BatchBuilder, DeadLetterClass},
};
use types::{Group, InsertionId};

fn any_key(subspace: u8, key: impl Into<Vec<u8>>) -> AnyKey<Vec<u8>> {
    AnyKey {
        subspace,
        key: key.into(),
    }
}

async fn keys(db: &Store, params: IterateParams<AnyKey<Vec<u8>>>) -> Vec<(String, String)> {
    let mut results = Vec::new();
    db.iterate(params, |key, value| {
        results.push((
            String::from_utf8(key.to_vec()).unwrap(),
            String::from_utf8(value.to_vec()).unwrap(),
        ));
        Ok(true)
    })
    .await
    .unwrap();
    results
}

pub async fn test(db: Store) {
    println!("Running basic key/value tests...");
    let mut batch = BatchBuilder::new();
    for key in ["a1", "a2", "a3", "b1", "b2"] {
        batch.set(
            AnyClass {
                subspace: SUBSPACE_DEAD_LETTER,
                key: key.as_bytes().to_vec(),
            },
            format!("value-{key}").into_bytes(),
        );
    }
    batch.set(
        AnyClass {
            subspace: SUBSPACE_DEAD_LETTER_GROUP,
            key: b"a2".to_vec(),
        },
        Vec::new(),
    );
    db.write(batch.build_all()).await.unwrap();

    assert_eq!(
        db.get_value::<String>(any_key(SUBSPACE_DEAD_LETTER, "a2"))
            .await
            .unwrap(),
        Some("value-a2".to_string())
    );
    assert_eq!(
        db.get_value::<String>(any_key(SUBSPACE_DEAD_LETTER, "zz"))
            .await
            .unwrap(),
        None
    );
    assert_eq!(
        db.get_value::<()>(any_key(SUBSPACE_DEAD_LETTER_GROUP, "a2"))
            .await
            .unwrap(),
        Some(())
    );

    // Ranges are inclusive on both ends
    assert_eq!(
        keys(
            &db,
            IterateParams::new(
                any_key(SUBSPACE_DEAD_LETTER, "a2"),
                any_key(SUBSPACE_DEAD_LETTER, "b1")
            )
        )
        .await,
        vec![
            ("a2".to_string(), "value-a2".to_string()),
            ("a3".to_string(), "value-a3".to_string()),
            ("b1".to_string(), "value-b1".to_string()),
        ]
    );

    // Descending, limited and key-only scans
    assert_eq!(
        keys(
            &db,
            IterateParams::new(
                any_key(SUBSPACE_DEAD_LETTER, ""),
                any_key(SUBSPACE_DEAD_LETTER, "z")
            )
            .descending()
            .with_limit(2)
            .no_values()
        )
        .await,
        vec![
            ("b2".to_string(), String::new()),
            ("b1".to_string(), String::new()),
        ]
    );
    assert_eq!(
        keys(
            &db,
            IterateParams::new(
                any_key(SUBSPACE_DEAD_LETTER, "b"),
                any_key(SUBSPACE_DEAD_LETTER, "z")
            )
            .only_first()
        )
        .await,
        vec![("b1".to_string(), "value-b1".to_string())]
    );
    assert!(
        keys(
            &db,
            IterateParams::new(
                any_key(SUBSPACE_DEAD_LETTER, "c"),
                any_key(SUBSPACE_DEAD_LETTER, "d")
            )
        )
        .await
        .is_empty()
    );

    // Overwrites and clears
    let mut batch = BatchBuilder::new();
    batch
        .set(
            AnyClass {
                subspace: SUBSPACE_DEAD_LETTER,
                key: b"a1".to_vec(),
            },
            b"updated".to_vec(),
        )
        .clear(AnyClass {
            subspace: SUBSPACE_DEAD_LETTER,
            key: b"a3".to_vec(),
        })
        .clear(AnyClass {
            subspace: SUBSPACE_DEAD_LETTER,
            key: b"never-written".to_vec(),
        });
    db.write(batch.build_all()).await.unwrap();
    assert_eq!(
        db.get_value::<String>(any_key(SUBSPACE_DEAD_LETTER, "a1"))
            .await
            .unwrap(),
        Some("updated".to_string())
    );
    assert_eq!(
        db.get_value::<String>(any_key(SUBSPACE_DEAD_LETTER, "a3"))
            .await
            .unwrap(),
        None
    );

    // Range deletion stays within its subspace
    db.delete_range(
        any_key(SUBSPACE_DEAD_LETTER, "a2"),
        any_key(SUBSPACE_DEAD_LETTER, "b2"),
    )
    .await
    .unwrap();
    assert_eq!(
        keys(
            &db,
            IterateParams::new(
                any_key(SUBSPACE_DEAD_LETTER, ""),
                any_key(SUBSPACE_DEAD_LETTER, "z")
            )
            .no_values()
        )
        .await,
        vec![("a1".to_string(), String::new())]
    );
    assert_eq!(
        db.get_value::<()>(any_key(SUBSPACE_DEAD_LETTER_GROUP, "a2"))
            .await
            .unwrap(),
        Some(())
    );
    db.destroy().await;

    println!("Running dead letter key layout tests...");
    let group = Group::new("MailboxListener").unwrap();
    let group_prefixed = Group::new("MailboxListenerGroup").unwrap();
    let mut ids = Vec::new();
    let mut batch = BatchBuilder::new();
    for (n, group) in [&group, &group_prefixed].into_iter().cycle().take(20).enumerate() {
        let insertion_id = InsertionId::random();
        if n % 2 == 0 {
            ids.push(insertion_id);
        }
        batch.set(
            DeadLetterClass::Event {
                group: group.clone(),
                insertion_id,
            },
            format!("event {n}").into_bytes(),
        );
    }
    db.write(batch.build_all()).await.unwrap();
    ids.sort_unstable();

    let mut found = Vec::new();
    db.iterate(
        IterateParams::new(
            DeadLetterClass::Event {
                group: group.clone(),
                insertion_id: InsertionId::MIN,
            },
            DeadLetterClass::Event {
                group: group.clone(),
                insertion_id: InsertionId::MAX,
            },
        )
        .no_values(),
        |key, _| {
            let (key_group, insertion_id) = DeadLetterClass::deserialize_event_key(key)?;
            assert_eq!(key_group, group);
            found.push(insertion_id);
            Ok(true)
        },
    )
    .await
    .unwrap();
    assert_eq!(found, ids);

    db.delete_range(
        DeadLetterClass::Event {
            group: group.clone(),
            insertion_id: InsertionId::MIN,
        },
        DeadLetterClass::Event {
            group: group.clone(),
            insertion_id: InsertionId::MAX,
        },
    )
    .await
    .unwrap();

    let mut remaining = 0;
    db.iterate(
        IterateParams::new(
            any_key(SUBSPACE_DEAD_LETTER, Vec::<u8>::new()),
            any_key(SUBSPACE_DEAD_LETTER, vec![u8::MAX; 32]),
        )
        .no_values(),
        |key, _| {
            assert_eq!(
                DeadLetterClass::deserialize_event_key(key)?.0,
                group_prefixed
            );
            remaining += 1;
            Ok(true)
        },
    )
    .await
    .unwrap();
    assert_eq!(remaining, 10);
    db.destroy().await;

    println!("Running large batch tests...");
    let mut batch = BatchBuilder::new();
    let mut total = 0;
    for n in 0..2500u32 {
        batch.set(
            AnyClass {
                subspace: SUBSPACE_DEAD_LETTER,
                key: n.to_be_bytes().to_vec(),
            },
            n.to_string().into_bytes(),
        );
        if batch.is_large_batch() {
            total += batch.len();
            db.write(batch.build_all()).await.unwrap();
        }
    }
    if !batch.is_empty() {
        total += batch.len();
        db.write(batch.build_all()).await.unwrap();
    }
    assert_eq!(total, 2500);

    let mut count = 0u32;
    db.iterate(
        IterateParams::new(
            any_key(SUBSPACE_DEAD_LETTER, 0u32.to_be_bytes()),
            any_key(SUBSPACE_DEAD_LETTER, u32::MAX.to_be_bytes()),
        ),
        |key, value| {
            assert_eq!(key, count.to_be_bytes());
            assert_eq!(value, count.to_string().as_bytes());
            count += 1;
            Ok(true)
        },
    )
    .await
    .unwrap();
    assert_eq!(count, 2500);
    db.destroy().await;

    println!("Running concurrent write tests...");
    let mut handles = Vec::new();
    for n in 0..100u32 {
        let db = db.clone();
        handles.push(tokio::spawn(async move {
            let mut batch = BatchBuilder::new();
            batch.set(
                AnyClass {
                    subspace: SUBSPACE_DEAD_LETTER,
                    key: b"shared".to_vec(),
                },
                n.to_be_bytes().to_vec(),
            );
            db.write(batch.build_all()).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
    let value = db
        .get_value::<Vec<u8>>(any_key(SUBSPACE_DEAD_LETTER, "shared"))
        .await
        .unwrap()
        .unwrap();
    assert!(u32::from_be_bytes(value.try_into().unwrap()) < 100);
}

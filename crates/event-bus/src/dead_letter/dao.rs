/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use futures::{Stream, StreamExt, TryStreamExt, stream};
use store::{
    IterateParams, Key, SUBSPACE_DEAD_LETTER, SUBSPACE_DEAD_LETTER_GROUP, Store,
    backend::next_key,
    write::{AnyKey, BatchBuilder, DeadLetterClass},
};
use trc::AddContext;
use types::{Group, InsertionId};

/// Maps dead letters onto two subspaces: the records themselves, keyed by
/// group prefix and insertion id, and an index of every group that ever
/// had a record.
#[derive(Debug, Clone)]
pub struct DeadLetterDao {
    store: Store,
    page_size: usize,
}

impl DeadLetterDao {
    pub fn new(store: Store, page_size: usize) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub async fn insert(
        &self,
        group: &Group,
        insertion_id: InsertionId,
        payload: String,
    ) -> trc::Result<()> {
        let mut batch = BatchBuilder::new();
        batch
            .set(DeadLetterClass::Group(group.clone()), Vec::new())
            .set(
                DeadLetterClass::Event {
                    group: group.clone(),
                    insertion_id,
                },
                payload.into_bytes(),
            );
        self.store
            .write(batch.build_all())
            .await
            .caused_by(trc::location!())
    }

    pub async fn delete(&self, group: &Group, insertion_id: InsertionId) -> trc::Result<()> {
        let mut batch = BatchBuilder::new();
        batch.clear(DeadLetterClass::Event {
            group: group.clone(),
            insertion_id,
        });
        self.store
            .write(batch.build_all())
            .await
            .caused_by(trc::location!())
    }

    /// Drops the index entry before the records, so a concurrent insert
    /// can only leave a stale entry behind, never an unindexed record.
    pub async fn delete_group(&self, group: &Group) -> trc::Result<()> {
        let mut batch = BatchBuilder::new();
        batch.clear(DeadLetterClass::Group(group.clone()));
        self.store
            .write(batch.build_all())
            .await
            .caused_by(trc::location!())?;

        let (from, to) = event_range(group);
        self.store
            .delete_range(from, to)
            .await
            .caused_by(trc::location!())
    }

    pub async fn get(
        &self,
        group: &Group,
        insertion_id: InsertionId,
    ) -> trc::Result<Option<Vec<u8>>> {
        self.store
            .get_value::<Vec<u8>>(DeadLetterClass::Event {
                group: group.clone(),
                insertion_id,
            })
            .await
            .caused_by(trc::location!())
    }

    pub async fn has_events(&self, group: &Group) -> trc::Result<bool> {
        let (from, to) = event_range(group);
        let mut found = false;
        self.store
            .iterate(
                IterateParams::new(from, to).only_first().no_values(),
                |_, _| {
                    found = true;
                    Ok(false)
                },
            )
            .await
            .caused_by(trc::location!())?;
        Ok(found)
    }

    pub fn ids(
        &self,
        group: &Group,
    ) -> impl Stream<Item = trc::Result<InsertionId>> + Send + use<> {
        let (from, to) = event_range(group);
        self.scan(SUBSPACE_DEAD_LETTER, from.serialize(), to.serialize(), false)
            .map(|row| {
                row.and_then(|(key, _)| DeadLetterClass::deserialize_event_key(&key))
                    .map(|(_, insertion_id)| insertion_id)
            })
    }

    pub fn events(
        &self,
        group: &Group,
    ) -> impl Stream<Item = trc::Result<(InsertionId, Vec<u8>)>> + Send + use<> {
        let (from, to) = event_range(group);
        self.scan(SUBSPACE_DEAD_LETTER, from.serialize(), to.serialize(), true)
            .map(|row| {
                row.and_then(|(key, value)| {
                    DeadLetterClass::deserialize_event_key(&key)
                        .map(|(_, insertion_id)| (insertion_id, value))
                })
            })
    }

    /// Every group with a record, plus groups whose records were removed
    /// one by one since.
    pub fn known_groups(&self) -> impl Stream<Item = trc::Result<Group>> + Send + use<> {
        self.scan(SUBSPACE_DEAD_LETTER_GROUP, Vec::new(), vec![u8::MAX], false)
            .map(|row| row.and_then(|(key, _)| Group::from_bytes(&key)))
    }

    /// Walks `[begin, end]` one page at a time, resuming after the last key
    /// returned by the previous page.
    fn scan(
        &self,
        subspace: u8,
        begin: Vec<u8>,
        end: Vec<u8>,
        values: bool,
    ) -> impl Stream<Item = trc::Result<(Vec<u8>, Vec<u8>)>> + Send + use<> {
        let store = self.store.clone();
        let page_size = self.page_size;

        stream::try_unfold(Some(begin), move |cursor| {
            let store = store.clone();
            let end = end.clone();
            async move {
                let Some(begin) = cursor else {
                    return Ok(None);
                };

                let mut rows = Vec::with_capacity(page_size);
                store
                    .iterate(
                        IterateParams::new(
                            AnyKey {
                                subspace,
                                key: begin,
                            },
                            AnyKey { subspace, key: end },
                        )
                        .set_values(values)
                        .with_limit(page_size),
                        |key, value| {
                            rows.push((key.to_vec(), value.to_vec()));
                            Ok(rows.len() < page_size)
                        },
                    )
                    .await
                    .caused_by(trc::location!())?;

                let cursor = if rows.len() >= page_size {
                    rows.last().map(|(key, _)| next_key(key))
                } else {
                    None
                };

                let page = stream::iter(rows.into_iter().map(Ok::<_, trc::Error>));
                Ok::<_, trc::Error>(Some((page, cursor)))
            }
        })
        .try_flatten()
    }
}

fn event_range(group: &Group) -> (DeadLetterClass, DeadLetterClass) {
    (
        DeadLetterClass::Event {
            group: group.clone(),
            insertion_id: InsertionId::MIN,
        },
        DeadLetterClass::Event {
            group: group.clone(),
            insertion_id: InsertionId::MAX,
        },
    )
}

/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod dao;
pub mod health;

use crate::codec::EventSerializer;
use dao::DeadLetterDao;
use futures::{Stream, StreamExt, TryStreamExt};
use std::{pin::pin, sync::Arc};
use store::{Store, Stores};
use trc::{AddContext, EventBusEvent};
use types::{Group, InsertionId};
use utils::config::Config;

pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Durable record of events a listener group failed to process, keyed by
/// group and insertion id.
pub struct EventDeadLetters<S: EventSerializer> {
    dao: DeadLetterDao,
    serializer: Arc<S>,
}

impl<S: EventSerializer> Clone for EventDeadLetters<S> {
    fn clone(&self) -> Self {
        Self {
            dao: self.dao.clone(),
            serializer: self.serializer.clone(),
        }
    }
}

impl<S: EventSerializer> EventDeadLetters<S> {
    pub fn new(store: Store, serializer: S) -> Self {
        Self {
            dao: DeadLetterDao::new(store, DEFAULT_PAGE_SIZE),
            serializer: Arc::new(serializer),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.dao = DeadLetterDao::new(self.dao.store().clone(), page_size);
        self
    }

    pub fn parse(config: &mut Config, stores: &Stores, serializer: S) -> Option<Self> {
        let store = stores.get_store_or_default(config, "event-bus.dead-letter.store")?;
        let page_size = config
            .property_or_default::<usize>("event-bus.dead-letter.page-size", "100")
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let page_size = if page_size == 0 {
            config.new_applied_default(
                "event-bus.dead-letter.page-size",
                DEFAULT_PAGE_SIZE.to_string(),
            );
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };

        Some(Self::new(store, serializer).with_page_size(page_size))
    }

    pub fn backing_store(&self) -> &Store {
        self.dao.store()
    }

    pub fn serializer(&self) -> &S {
        &self.serializer
    }

    /// Records a failed delivery under a freshly minted insertion id.
    pub async fn store(&self, group: &Group, event: &S::Event) -> trc::Result<InsertionId> {
        let insertion_id = InsertionId::random();
        self.store_with_id(group, insertion_id, event)
            .await
            .map(|_| insertion_id)
    }

    /// Records a failed delivery under a known insertion id, replacing any
    /// record already stored for the same key.
    pub async fn store_with_id(
        &self,
        group: &Group,
        insertion_id: InsertionId,
        event: &S::Event,
    ) -> trc::Result<()> {
        let payload = self
            .serializer
            .serialize(event)
            .add_context(|err| err.ctx(trc::Key::Group, group))
            .caused_by(trc::location!())?;
        let size = payload.len();

        self.dao
            .insert(group, insertion_id, payload)
            .await
            .caused_by(trc::location!())?;

        trc::event!(
            EventBus(EventBusEvent::DeadLetterStored),
            Group = group,
            Id = insertion_id,
            Size = size,
        );

        Ok(())
    }

    pub async fn remove(&self, group: &Group, insertion_id: InsertionId) -> trc::Result<()> {
        self.dao
            .delete(group, insertion_id)
            .await
            .caused_by(trc::location!())?;

        trc::event!(
            EventBus(EventBusEvent::DeadLetterRemoved),
            Group = group,
            Id = insertion_id,
        );

        Ok(())
    }

    pub async fn remove_group(&self, group: &Group) -> trc::Result<()> {
        self.dao
            .delete_group(group)
            .await
            .caused_by(trc::location!())?;

        trc::event!(EventBus(EventBusEvent::DeadLetterGroupRemoved), Group = group);

        Ok(())
    }

    /// Returns `None` both for unknown keys and for payloads that no longer
    /// decode.
    pub async fn failed_event(
        &self,
        group: &Group,
        insertion_id: InsertionId,
    ) -> trc::Result<Option<S::Event>> {
        match self
            .dao
            .get(group, insertion_id)
            .await
            .caused_by(trc::location!())?
        {
            Some(payload) => Ok(decode(&*self.serializer, group, insertion_id, payload)),
            None => {
                trc::event!(
                    EventBus(EventBusEvent::DeadLetterNotFound),
                    Group = group,
                    Id = insertion_id,
                );
                Ok(None)
            }
        }
    }

    pub fn failed_ids(
        &self,
        group: &Group,
    ) -> impl Stream<Item = trc::Result<InsertionId>> + Send + use<S> {
        self.dao.ids(group)
    }

    /// Lists the records of a group along with their decoded events. Records
    /// that fail to decode are still listed so they can be removed.
    pub fn failed_events(
        &self,
        group: &Group,
    ) -> impl Stream<Item = trc::Result<(InsertionId, Option<S::Event>)>> + Send + use<S> {
        let serializer = self.serializer.clone();
        let group = group.clone();
        self.dao.events(&group).map(move |row| {
            row.map(|(insertion_id, payload)| {
                let event = decode(&*serializer, &group, insertion_id, payload);
                (insertion_id, event)
            })
        })
    }

    /// Whether any group has at least one record.
    pub async fn contain_events(&self) -> trc::Result<bool> {
        let mut groups = pin!(self.dao.known_groups());
        while let Some(group) = groups.try_next().await.caused_by(trc::location!())? {
            if self
                .dao
                .has_events(&group)
                .await
                .caused_by(trc::location!())?
            {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Lists each group having at least one record, once.
    pub fn groups_with_failed_events(
        &self,
    ) -> impl Stream<Item = trc::Result<Group>> + Send + use<S> {
        let dao = self.dao.clone();
        self.dao.known_groups().try_filter_map(move |group| {
            let dao = dao.clone();
            async move {
                let has_events = dao.has_events(&group).await?;
                Ok::<_, trc::Error>(has_events.then_some(group))
            }
        })
    }
}

fn decode<S: EventSerializer>(
    serializer: &S,
    group: &Group,
    insertion_id: InsertionId,
    payload: Vec<u8>,
) -> Option<S::Event> {
    match String::from_utf8(payload) {
        Ok(payload) => serializer.deserialize(&payload),
        Err(err) => {
            trc::event!(
                EventBus(EventBusEvent::DeserializeFailed),
                Group = group,
                Id = insertion_id,
                Reason = err.to_string(),
            );
            None
        }
    }
}

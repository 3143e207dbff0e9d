/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use event_bus::JsonEventSerializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const EVENT_ID_1: &str = "6e0dd59d-660e-4d9b-b22f-0354479f47b4";
pub const EVENT_ID_2: &str = "6e0dd59d-660e-4d9b-b22f-0354479f47b5";
pub const EVENT_ID_3: &str = "6e0dd59d-660e-4d9b-b22f-0354479f47b6";
pub const INSERTION_ID_1: &str = "6e0dd59d-660e-4d9b-b22f-0354479f47b7";
pub const INSERTION_ID_2: &str = "6e0dd59d-660e-4d9b-b22f-0354479f47b8";
pub const INSERTION_ID_3: &str = "6e0dd59d-660e-4d9b-b22f-0354479f47b9";

pub const GROUP_A: &str = "org.apache.james.mailbox.events.GroupA";
pub const GROUP_B: &str = "org.apache.james.mailbox.events.GroupB";
pub const USERNAME: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEvent {
    pub event_id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MailboxEvent {
    Test(TestEvent),
    MailboxAdded {
        event_id: Uuid,
        username: String,
        mailbox: String,
    },
    QuotaReset,
    Annotated {
        event_id: Uuid,
        annotations: BTreeMap<(u32, u32), String>,
    },
}

impl From<TestEvent> for MailboxEvent {
    fn from(value: TestEvent) -> Self {
        MailboxEvent::Test(value)
    }
}

impl MailboxEvent {
    pub fn test(event_id: &str) -> Self {
        MailboxEvent::Test(TestEvent {
            event_id: Uuid::parse_str(event_id).unwrap(),
            username: USERNAME.to_string(),
        })
    }

    /// Carries a map JSON cannot represent, so it never serializes.
    pub fn annotated() -> Self {
        MailboxEvent::Annotated {
            event_id: Uuid::new_v4(),
            annotations: BTreeMap::from([((1, 2), "flagged".to_string())]),
        }
    }

    pub fn mailbox_added(mailbox: &str) -> Self {
        MailboxEvent::MailboxAdded {
            event_id: Uuid::new_v4(),
            username: USERNAME.to_string(),
            mailbox: mailbox.to_string(),
        }
    }
}

pub fn serializer() -> JsonEventSerializer<MailboxEvent> {
    JsonEventSerializer::new()
        .with_type::<TestEvent>("Test")
        .with_variants(["MailboxAdded", "QuotaReset", "Annotated"])
}

/// A reader built before `MailboxAdded` existed.
pub fn legacy_serializer() -> JsonEventSerializer<MailboxEvent> {
    JsonEventSerializer::new().with_type::<TestEvent>("Test")
}

/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

pub const INSERTION_ID_LEN: usize = 16;

/// Identifier minted once per recorded delivery failure.
///
/// Ids are version 7 UUIDs, so ids minted later sort after earlier ones when
/// compared as bytes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct InsertionId(Uuid);

impl InsertionId {
    pub const MIN: InsertionId = InsertionId(Uuid::nil());
    pub const MAX: InsertionId = InsertionId(Uuid::from_bytes([0xff; INSERTION_ID_LEN]));

    pub fn random() -> Self {
        InsertionId(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        InsertionId(uuid)
    }

    pub fn from_bytes(bytes: &[u8]) -> trc::Result<Self> {
        Uuid::from_slice(bytes)
            .map(InsertionId)
            .map_err(|_| trc::Error::corrupted("invalid insertion id length"))
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8; INSERTION_ID_LEN] {
        self.0.as_bytes()
    }

    #[inline(always)]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn as_string(&self) -> String {
        self.0.hyphenated().to_string()
    }
}

impl Display for InsertionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for InsertionId {
    type Err = trc::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(InsertionId).map_err(|err| {
            trc::EventBusEvent::InvalidInsertionId
                .into_err()
                .ctx(trc::Key::Id, s.to_string())
                .reason(err)
        })
    }
}

impl From<Uuid> for InsertionId {
    fn from(value: Uuid) -> Self {
        InsertionId(value)
    }
}

impl From<InsertionId> for Uuid {
    fn from(value: InsertionId) -> Self {
        value.0
    }
}

impl From<InsertionId> for trc::Value {
    fn from(value: InsertionId) -> Self {
        trc::Value::String(value.0.hyphenated().to_string().into())
    }
}

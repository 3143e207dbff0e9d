/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{AnyClass, AnyKey, DeadLetterClass, ValueClass};
use crate::{Key, SUBSPACE_DEAD_LETTER, SUBSPACE_DEAD_LETTER_GROUP, U32_LEN};
use std::convert::TryInto;
use types::{Group, InsertionId, insertion_id::INSERTION_ID_LEN};

pub struct KeySerializer {
    pub buf: Vec<u8>,
}

pub trait KeySerialize {
    fn serialize(&self, buf: &mut Vec<u8>);
}

pub trait DeserializeBigEndian {
    fn deserialize_be_u32(&self, index: usize) -> trc::Result<u32>;
}

impl KeySerializer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write<T: KeySerialize>(mut self, value: T) -> Self {
        value.serialize(&mut self.buf);
        self
    }

    pub fn finalize(self) -> Vec<u8> {
        self.buf
    }
}

impl KeySerialize for u8 {
    fn serialize(&self, buf: &mut Vec<u8>) {
        buf.push(*self);
    }
}

impl KeySerialize for &str {
    fn serialize(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.as_bytes());
    }
}

impl KeySerialize for &[u8] {
    fn serialize(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self);
    }
}

impl KeySerialize for u32 {
    fn serialize(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_be_bytes());
    }
}

impl KeySerialize for &Group {
    fn serialize(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.as_bytes());
    }
}

impl KeySerialize for InsertionId {
    fn serialize(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.as_bytes());
    }
}

impl DeserializeBigEndian for &[u8] {
    fn deserialize_be_u32(&self, index: usize) -> trc::Result<u32> {
        self.get(index..index + U32_LEN)
            .ok_or_else(|| {
                trc::StoreEvent::DataCorruption
                    .caused_by(trc::location!())
                    .ctx(trc::Key::Value, *self)
            })
            .and_then(|bytes| {
                bytes.try_into().map_err(|_| {
                    trc::StoreEvent::DataCorruption
                        .caused_by(trc::location!())
                        .ctx(trc::Key::Value, *self)
                })
            })
            .map(u32::from_be_bytes)
    }
}

impl DeadLetterClass {
    /// Prefix shared by every dead letter key of a group: the group name
    /// preceded by its length, so no group prefix is a prefix of another.
    pub fn group_prefix(group: &Group) -> KeySerializer {
        KeySerializer::new(U32_LEN + group.len() + INSERTION_ID_LEN)
            .write(group.len() as u32)
            .write(group)
    }

    /// Extracts the group and insertion id from a serialized dead letter key.
    pub fn deserialize_event_key(key: &[u8]) -> trc::Result<(Group, InsertionId)> {
        let group_len = key.deserialize_be_u32(0)? as usize;
        let group = key
            .get(U32_LEN..U32_LEN + group_len)
            .ok_or_else(|| trc::Error::corrupted("truncated dead letter key"))
            .and_then(Group::from_bytes)?;
        let insertion_id = key
            .get(U32_LEN + group_len..)
            .filter(|id| id.len() == INSERTION_ID_LEN)
            .ok_or_else(|| trc::Error::corrupted("invalid dead letter key length"))
            .and_then(InsertionId::from_bytes)?;

        Ok((group, insertion_id))
    }
}

impl ValueClass {
    pub fn serialize(&self) -> Vec<u8> {
        match self {
            ValueClass::DeadLetter(DeadLetterClass::Event {
                group,
                insertion_id,
            }) => DeadLetterClass::group_prefix(group)
                .write(*insertion_id)
                .finalize(),
            ValueClass::DeadLetter(DeadLetterClass::Group(group)) => {
                KeySerializer::new(group.len()).write(group).finalize()
            }
            ValueClass::Any(any) => any.key.clone(),
        }
    }

    pub fn subspace(&self) -> u8 {
        match self {
            ValueClass::DeadLetter(DeadLetterClass::Event { .. }) => SUBSPACE_DEAD_LETTER,
            ValueClass::DeadLetter(DeadLetterClass::Group(_)) => SUBSPACE_DEAD_LETTER_GROUP,
            ValueClass::Any(any) => any.subspace,
        }
    }

    pub fn serialized_size(&self) -> usize {
        match self {
            ValueClass::DeadLetter(DeadLetterClass::Event { group, .. }) => {
                U32_LEN + group.len() + INSERTION_ID_LEN
            }
            ValueClass::DeadLetter(DeadLetterClass::Group(group)) => group.len(),
            ValueClass::Any(any) => any.key.len(),
        }
    }
}

impl Key for ValueClass {
    fn serialize(&self) -> Vec<u8> {
        ValueClass::serialize(self)
    }

    fn subspace(&self) -> u8 {
        ValueClass::subspace(self)
    }
}

impl Key for DeadLetterClass {
    fn serialize(&self) -> Vec<u8> {
        ValueClass::DeadLetter(self.clone()).serialize()
    }

    fn subspace(&self) -> u8 {
        match self {
            DeadLetterClass::Event { .. } => SUBSPACE_DEAD_LETTER,
            DeadLetterClass::Group(_) => SUBSPACE_DEAD_LETTER_GROUP,
        }
    }
}

impl<T: AsRef<[u8]> + Sync + Send + Clone> Key for AnyKey<T> {
    fn serialize(&self) -> Vec<u8> {
        self.key.as_ref().to_vec()
    }

    fn subspace(&self) -> u8 {
        self.subspace
    }
}

impl Key for AnyClass {
    fn serialize(&self) -> Vec<u8> {
        self.key.clone()
    }

    fn subspace(&self) -> u8 {
        self.subspace
    }
}

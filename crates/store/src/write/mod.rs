/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use types::{Group, InsertionId};

pub mod batch;
pub mod key;

pub(crate) const MAX_BATCH_OPS: usize = 1000;
pub(crate) const MAX_BATCH_SIZE: usize = 5 * 1024 * 1024;

#[derive(Debug, Default)]
pub struct Batch {
    pub(crate) ops: Vec<Operation>,
}

#[derive(Debug, Default)]
pub struct BatchBuilder {
    ops: Vec<Operation>,
    batch_size: usize,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Operation {
    Value { class: ValueClass, op: ValueOp },
}

#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub enum ValueClass {
    DeadLetter(DeadLetterClass),
    Any(AnyClass),
}

#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub enum DeadLetterClass {
    Event {
        group: Group,
        insertion_id: InsertionId,
    },
    Group(Group),
}

#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct AnyClass {
    pub subspace: u8,
    pub key: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnyKey<T: AsRef<[u8]>> {
    pub subspace: u8,
    pub key: T,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum ValueOp {
    Set(Vec<u8>),
    Clear,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }
}

impl From<DeadLetterClass> for ValueClass {
    fn from(value: DeadLetterClass) -> Self {
        ValueClass::DeadLetter(value)
    }
}

impl From<AnyClass> for ValueClass {
    fn from(value: AnyClass) -> Self {
        ValueClass::Any(value)
    }
}

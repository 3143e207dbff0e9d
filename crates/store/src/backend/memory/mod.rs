/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::{
    Deserialize, IterateParams, Key,
    write::{Batch, Operation, ValueOp},
};
use ahash::AHashMap;
use parking_lot::RwLock;
use std::{collections::BTreeMap, ops::Bound};

type Subspace = BTreeMap<Vec<u8>, Vec<u8>>;

/// Volatile store keeping each subspace in an ordered map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    subspaces: RwLock<AHashMap<u8, Subspace>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get_value<U>(&self, key: impl Key) -> trc::Result<Option<U>>
    where
        U: Deserialize + 'static,
    {
        let subspaces = self.subspaces.read();
        match subspaces
            .get(&key.subspace())
            .and_then(|subspace| subspace.get(&key.serialize()))
        {
            Some(value) => U::deserialize(value).map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn iterate<T: Key>(
        &self,
        params: IterateParams<T>,
        mut cb: impl for<'x> FnMut(&'x [u8], &'x [u8]) -> trc::Result<bool> + Sync + Send,
    ) -> trc::Result<()> {
        let begin = params.begin.serialize();
        let end = params.end.serialize();
        if begin > end {
            return Ok(());
        }

        // Rows are copied out so the callback never runs under the lock
        let rows = {
            let subspaces = self.subspaces.read();
            let Some(subspace) = subspaces.get(&params.subspace()) else {
                return Ok(());
            };
            let range = subspace.range::<[u8], _>((
                Bound::Included(begin.as_slice()),
                Bound::Included(end.as_slice()),
            ));
            let limit = params.limit.unwrap_or(usize::MAX);
            let copy = |(key, value): (&Vec<u8>, &Vec<u8>)| {
                (
                    key.clone(),
                    if params.values {
                        value.clone()
                    } else {
                        Vec::new()
                    },
                )
            };

            if params.ascending {
                range.take(limit).map(copy).collect::<Vec<_>>()
            } else {
                range.rev().take(limit).map(copy).collect::<Vec<_>>()
            }
        };

        for (key, value) in rows {
            if !cb(&key, &value)? {
                break;
            }
        }

        Ok(())
    }

    pub(crate) fn write(&self, batch: Batch) -> trc::Result<()> {
        let mut subspaces = self.subspaces.write();
        for op in batch.ops {
            let Operation::Value { class, op } = op;
            let subspace = subspaces.entry(class.subspace()).or_default();
            match op {
                ValueOp::Set(value) => {
                    subspace.insert(class.serialize(), value);
                }
                ValueOp::Clear => {
                    subspace.remove(&class.serialize());
                }
            }
        }

        Ok(())
    }

    pub(crate) fn delete_range(&self, from: impl Key, to: impl Key) -> trc::Result<()> {
        let subspace = from.subspace();
        let from = from.serialize();
        let to = to.serialize();
        if from > to {
            return Ok(());
        }

        let mut subspaces = self.subspaces.write();
        if let Some(subspace) = subspaces.get_mut(&subspace) {
            let keys = subspace
                .range::<[u8], _>((
                    Bound::Included(from.as_slice()),
                    Bound::Included(to.as_slice()),
                ))
                .map(|(key, _)| key.clone())
                .collect::<Vec<_>>();
            for key in keys {
                subspace.remove(&key);
            }
        }

        Ok(())
    }
}

/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{RocksDbStore, cf_not_found, into_error};
use crate::{
    Key,
    backend::{next_key, subspace_name},
    write::{Batch, Operation, ValueOp},
};
use rocksdb::WriteBatch;

impl RocksDbStore {
    pub(crate) async fn write(&self, batch: Batch) -> trc::Result<()> {
        self.spawn_worker(move |db| {
            let mut wb = WriteBatch::default();

            for op in &batch.ops {
                let Operation::Value { class, op } = op;
                let subspace = class.subspace();
                let cf = db
                    .cf_handle(&subspace_name(subspace))
                    .ok_or_else(|| cf_not_found(subspace))?;
                let key = class.serialize();

                match op {
                    ValueOp::Set(value) => wb.put_cf(&cf, &key, value),
                    ValueOp::Clear => wb.delete_cf(&cf, &key),
                }
            }

            db.write(wb).map_err(into_error)
        })
        .await
    }

    pub(crate) async fn delete_range(&self, from: impl Key, to: impl Key) -> trc::Result<()> {
        let subspace = from.subspace();
        let from = from.serialize();
        // RocksDB range deletes exclude the upper bound
        let to = next_key(&to.serialize());

        self.spawn_worker(move |db| {
            let cf = db
                .cf_handle(&subspace_name(subspace))
                .ok_or_else(|| cf_not_found(subspace))?;
            db.delete_range_cf(&cf, &from, &to).map_err(into_error)
        })
        .await
    }
}

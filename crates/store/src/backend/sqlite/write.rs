/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{SqliteStore, into_error, into_pool_error};
use crate::{
    Key,
    backend::subspace_name,
    write::{Batch, Operation, ValueOp},
};
use rusqlite::{TransactionBehavior, params};

impl SqliteStore {
    pub(crate) async fn write(&self, batch: Batch) -> trc::Result<()> {
        self.spawn_worker(move |conn_pool| {
            let mut conn = conn_pool.get().map_err(into_pool_error)?;
            let trx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(into_error)?;

            for op in &batch.ops {
                let Operation::Value { class, op } = op;
                let table = subspace_name(class.subspace());
                let key = class.serialize();

                match op {
                    ValueOp::Set(value) => {
                        trx.prepare_cached(&format!(
                            "INSERT OR REPLACE INTO {table} (k, v) VALUES (?, ?)"
                        ))
                        .map_err(into_error)?
                        .execute(params![&key, value])
                        .map_err(into_error)?;
                    }
                    ValueOp::Clear => {
                        trx.prepare_cached(&format!("DELETE FROM {table} WHERE k = ?"))
                            .map_err(into_error)?
                            .execute([&key])
                            .map_err(into_error)?;
                    }
                }
            }

            trx.commit().map_err(into_error)
        })
        .await
    }

    pub(crate) async fn delete_range(&self, from: impl Key, to: impl Key) -> trc::Result<()> {
        let table = subspace_name(from.subspace());
        let from = from.serialize();
        let to = to.serialize();

        self.spawn_worker(move |conn_pool| {
            let conn = conn_pool.get().map_err(into_pool_error)?;
            conn.prepare_cached(&format!("DELETE FROM {table} WHERE k >= ? AND k <= ?"))
                .map_err(into_error)?
                .execute([&from, &to])
                .map_err(into_error)
                .map(|_| ())
        })
        .await
    }
}

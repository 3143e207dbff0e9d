/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{PostgresStore, into_error, into_pool_error};
use crate::{
    Key,
    backend::subspace_name,
    write::{Batch, Operation, ValueOp},
};

impl PostgresStore {
    pub(crate) async fn write(&self, batch: Batch) -> trc::Result<()> {
        let mut conn = self.conn_pool.get().await.map_err(into_pool_error)?;
        let trx = conn.transaction().await.map_err(into_error)?;

        for op in &batch.ops {
            let Operation::Value { class, op } = op;
            let table = subspace_name(class.subspace());
            let key = class.serialize();

            match op {
                ValueOp::Set(value) => {
                    let s = trx
                        .prepare_cached(&format!(
                            concat!(
                                "INSERT INTO {} (k, v) VALUES ($1, $2) ",
                                "ON CONFLICT (k) DO UPDATE SET v = EXCLUDED.v"
                            ),
                            table
                        ))
                        .await
                        .map_err(into_error)?;
                    trx.execute(&s, &[&key, value])
                        .await
                        .map_err(into_error)?;
                }
                ValueOp::Clear => {
                    let s = trx
                        .prepare_cached(&format!("DELETE FROM {table} WHERE k = $1"))
                        .await
                        .map_err(into_error)?;
                    trx.execute(&s, &[&key]).await.map_err(into_error)?;
                }
            }
        }

        trx.commit().await.map_err(into_error)
    }

    pub(crate) async fn delete_range(&self, from: impl Key, to: impl Key) -> trc::Result<()> {
        let conn = self.conn_pool.get().await.map_err(into_pool_error)?;
        let s = conn
            .prepare_cached(&format!(
                "DELETE FROM {} WHERE k >= $1 AND k <= $2",
                subspace_name(from.subspace())
            ))
            .await
            .map_err(into_error)?;

        conn.execute(&s, &[&from.serialize(), &to.serialize()])
            .await
            .map_err(into_error)
            .map(|_| ())
    }
}

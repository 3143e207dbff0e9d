/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{SqliteStore, into_error, into_pool_error};
use crate::{Deserialize, IterateParams, Key, backend::subspace_name};
use rusqlite::OptionalExtension;

impl SqliteStore {
    pub(crate) async fn get_value<U>(&self, key: impl Key) -> trc::Result<Option<U>>
    where
        U: Deserialize + 'static,
    {
        let table = subspace_name(key.subspace());
        let key = key.serialize();

        self.spawn_worker(move |conn_pool| {
            let conn = conn_pool.get().map_err(into_pool_error)?;
            let mut result = conn
                .prepare_cached(&format!("SELECT v FROM {table} WHERE k = ?"))
                .map_err(into_error)?;
            result
                .query_row([&key], |row| row.get::<_, Vec<u8>>(0))
                .optional()
                .map_err(into_error)?
                .map(U::deserialize_owned)
                .transpose()
        })
        .await
    }

    pub(crate) async fn iterate<T: Key>(
        &self,
        params: IterateParams<T>,
        mut cb: impl for<'x> FnMut(&'x [u8], &'x [u8]) -> trc::Result<bool> + Sync + Send,
    ) -> trc::Result<()> {
        let table = subspace_name(params.subspace());
        let begin = params.begin.serialize();
        let end = params.end.serialize();
        let keys = if params.values { "k, v" } else { "k" };
        let query = format!(
            "SELECT {keys} FROM {table} WHERE k >= ? AND k <= ? ORDER BY k {}{}",
            if params.ascending { "ASC" } else { "DESC" },
            params
                .limit
                .map(|limit| format!(" LIMIT {limit}"))
                .unwrap_or_default()
        );
        let with_values = params.values;

        let rows = self
            .spawn_worker(move |conn_pool| {
                let conn = conn_pool.get().map_err(into_pool_error)?;
                let mut query = conn.prepare_cached(&query).map_err(into_error)?;
                let mut rows = query.query([&begin, &end]).map_err(into_error)?;
                let mut results = Vec::new();

                while let Some(row) = rows.next().map_err(into_error)? {
                    let key = row.get::<_, Vec<u8>>(0).map_err(into_error)?;
                    let value = if with_values {
                        row.get::<_, Vec<u8>>(1).map_err(into_error)?
                    } else {
                        Vec::new()
                    };
                    results.push((key, value));
                }

                Ok(results)
            })
            .await?;

        for (key, value) in rows {
            if !cb(&key, &value)? {
                break;
            }
        }

        Ok(())
    }
}

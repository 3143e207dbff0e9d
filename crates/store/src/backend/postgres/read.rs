/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{PostgresStore, into_error, into_pool_error};
use crate::{Deserialize, IterateParams, Key, backend::subspace_name};
use futures::TryStreamExt;

impl PostgresStore {
    pub(crate) async fn get_value<U>(&self, key: impl Key) -> trc::Result<Option<U>>
    where
        U: Deserialize + 'static,
    {
        let conn = self.conn_pool.get().await.map_err(into_pool_error)?;
        let s = conn
            .prepare_cached(&format!(
                "SELECT v FROM {} WHERE k = $1",
                subspace_name(key.subspace())
            ))
            .await
            .map_err(into_error)?;
        let key = key.serialize();

        match conn.query_opt(&s, &[&key]).await.map_err(into_error)? {
            Some(row) => row
                .try_get::<_, Vec<u8>>(0)
                .map_err(into_error)
                .and_then(U::deserialize_owned)
                .map(Some),
            None => Ok(None),
        }
    }

    pub(crate) async fn iterate<T: Key>(
        &self,
        params: IterateParams<T>,
        mut cb: impl for<'x> FnMut(&'x [u8], &'x [u8]) -> trc::Result<bool> + Sync + Send,
    ) -> trc::Result<()> {
        let conn = self.conn_pool.get().await.map_err(into_pool_error)?;
        let table = subspace_name(params.subspace());
        let begin = params.begin.serialize();
        let end = params.end.serialize();
        let keys = if params.values { "k, v" } else { "k" };

        let s = conn
            .prepare_cached(&format!(
                "SELECT {keys} FROM {table} WHERE k >= $1 AND k <= $2 ORDER BY k {}{}",
                if params.ascending { "ASC" } else { "DESC" },
                params
                    .limit
                    .map(|limit| format!(" LIMIT {limit}"))
                    .unwrap_or_default()
            ))
            .await
            .map_err(into_error)?;
        let rows = conn
            .query_raw(&s, &[&begin, &end])
            .await
            .map_err(into_error)?;
        let mut rows = std::pin::pin!(rows);

        if params.values {
            while let Some(row) = rows.try_next().await.map_err(into_error)? {
                let key = row.try_get::<_, &[u8]>(0).map_err(into_error)?;
                let value = row.try_get::<_, &[u8]>(1).map_err(into_error)?;

                if !cb(key, value)? {
                    break;
                }
            }
        } else {
            while let Some(row) = rows.try_next().await.map_err(into_error)? {
                if !cb(row.try_get::<_, &[u8]>(0).map_err(into_error)?, b"")? {
                    break;
                }
            }
        }

        Ok(())
    }
}

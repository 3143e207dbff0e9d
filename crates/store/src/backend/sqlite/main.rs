/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{SqliteStore, into_error, into_pool_error, pool::SqliteConnectionManager};
use crate::{SUBSPACES, backend::subspace_name};
use std::{path::PathBuf, sync::Arc};
use utils::config::{Config, utils::AsKey};

impl SqliteStore {
    pub fn open(config: &mut Config, prefix: impl AsKey) -> Option<Self> {
        let prefix = prefix.as_key();
        let path = PathBuf::from(config.value_require((&prefix, "path"))?);
        let pool_workers = config
            .property::<usize>((&prefix, "pool.workers"))
            .filter(|v| *v > 0)
            .unwrap_or_else(num_cpus::get);
        let pool_max_connections = config
            .property::<u32>((&prefix, "pool.max-connections"))
            .filter(|v| *v > 0)
            .unwrap_or_else(|| (num_cpus::get() * 4) as u32);

        match Self::open_path(path, pool_workers, pool_max_connections) {
            Ok(db) => Some(db),
            Err(err) => {
                config.new_build_error(prefix.as_str(), format!("Failed to open database: {err}"));
                None
            }
        }
    }

    pub fn open_path(
        path: PathBuf,
        pool_workers: usize,
        pool_max_connections: u32,
    ) -> trc::Result<Self> {
        let db = Self {
            conn_pool: r2d2::Pool::builder()
                .max_size(pool_max_connections)
                .build(
                    SqliteConnectionManager::file(path).with_init(|c| {
                        c.execute_batch(concat!(
                            "PRAGMA journal_mode = WAL; ",
                            "PRAGMA synchronous = NORMAL; ",
                            "PRAGMA temp_store = memory; ",
                            "PRAGMA busy_timeout = 30000;"
                        ))
                    }),
                )
                .map_err(into_pool_error)?,
            worker_pool: Arc::new(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(pool_workers)
                    .thread_name(|i| format!("sqlite-{i}"))
                    .build()
                    .map_err(|err| {
                        trc::EventType::Server(trc::ServerEvent::ThreadError)
                            .reason(err)
                            .details("Failed to build worker pool")
                    })?,
            ),
        };

        db.create_tables()?;

        Ok(db)
    }

    pub(super) fn create_tables(&self) -> trc::Result<()> {
        let conn = self.conn_pool.get().map_err(into_pool_error)?;

        for subspace in SUBSPACES {
            let table = subspace_name(*subspace);
            conn.execute(
                &format!(
                    "CREATE TABLE IF NOT EXISTS {table} (
                        k BLOB PRIMARY KEY,
                        v BLOB NOT NULL
                    )"
                ),
                [],
            )
            .map_err(into_error)?;
        }

        Ok(())
    }

    pub(crate) async fn close(&self) -> trc::Result<()> {
        self.spawn_worker(|conn_pool| {
            conn_pool
                .get()
                .map_err(into_pool_error)?
                .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
                .map_err(into_error)
        })
        .await
    }
}

/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{RocksDb, RocksDbStore, into_error};
use crate::{SUBSPACES, backend::subspace_name};
use rocksdb::{ColumnFamilyDescriptor, Options};
use std::{path::PathBuf, sync::Arc};
use utils::config::{Config, utils::AsKey};

impl RocksDbStore {
    pub fn open(config: &mut Config, prefix: impl AsKey) -> Option<Self> {
        let prefix = prefix.as_key();
        let path = PathBuf::from(config.value_require((&prefix, "path"))?);
        let pool_workers = config
            .property::<usize>((&prefix, "pool.workers"))
            .filter(|v| *v > 0)
            .unwrap_or_else(num_cpus::get);

        match Self::open_path(path, pool_workers) {
            Ok(db) => Some(db),
            Err(err) => {
                config.new_build_error(prefix.as_str(), format!("Failed to open database: {err}"));
                None
            }
        }
    }

    pub fn open_path(path: PathBuf, pool_workers: usize) -> trc::Result<Self> {
        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);
        db_opts.set_max_background_jobs(std::cmp::max(num_cpus::get() as i32, 2));
        db_opts.increase_parallelism(num_cpus::get() as i32);

        let cf_opts = SUBSPACES
            .iter()
            .map(|subspace| {
                let mut cf_opts = Options::default();
                cf_opts.set_max_write_buffer_number(16);
                ColumnFamilyDescriptor::new(subspace_name(*subspace), cf_opts)
            })
            .collect::<Vec<_>>();

        Ok(RocksDbStore {
            db: Arc::new(RocksDb::open_cf_descriptors(&db_opts, &path, cf_opts).map_err(into_error)?),
            worker_pool: rayon::ThreadPoolBuilder::new()
                .num_threads(pool_workers)
                .thread_name(|i| format!("rocksdb-{i}"))
                .build()
                .map_err(|err| {
                    trc::EventType::Server(trc::ServerEvent::ThreadError)
                        .reason(err)
                        .details("Failed to build worker pool")
                })?,
        })
    }

    pub(crate) async fn close(&self) -> trc::Result<()> {
        self.spawn_worker(|db| {
            db.flush().map_err(into_error)?;
            db.cancel_all_background_work(true);
            Ok(())
        })
        .await
    }
}

/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use rocksdb::{DBWithThreadMode, MultiThreaded};
use std::sync::Arc;
use tokio::sync::oneshot;

pub mod main;
pub mod read;
pub mod write;

pub(crate) type RocksDb = DBWithThreadMode<MultiThreaded>;

pub struct RocksDbStore {
    pub(crate) db: Arc<RocksDb>,
    pub(crate) worker_pool: rayon::ThreadPool,
}

#[inline(always)]
fn into_error(err: rocksdb::Error) -> trc::Error {
    trc::StoreEvent::RocksdbError.reason(err)
}

fn cf_not_found(subspace: u8) -> trc::Error {
    trc::StoreEvent::RocksdbError
        .into_err()
        .details("Column family not found")
        .ctx(trc::Key::Collection, char::from(subspace).to_string())
}

impl RocksDbStore {
    /// Runs a blocking closure on the worker pool and awaits its result.
    pub(crate) async fn spawn_worker<U, V>(&self, f: U) -> trc::Result<V>
    where
        U: FnOnce(&RocksDb) -> trc::Result<V> + Send + 'static,
        V: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let db = self.db.clone();

        self.worker_pool.spawn(move || {
            tx.send(f(&db)).ok();
        });

        match rx.await {
            Ok(result) => result,
            Err(err) => Err(trc::EventType::Server(trc::ServerEvent::ThreadError).reason(err)),
        }
    }
}

/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use r2d2::Pool;
use std::sync::Arc;
use tokio::sync::oneshot;

use self::pool::SqliteConnectionManager;

pub mod main;
pub mod pool;
pub mod read;
pub mod write;

pub struct SqliteStore {
    pub(crate) conn_pool: Pool<SqliteConnectionManager>,
    pub(crate) worker_pool: Arc<rayon::ThreadPool>,
}

#[inline(always)]
fn into_error(err: impl std::fmt::Display) -> trc::Error {
    trc::StoreEvent::SqliteError.reason(err)
}

#[inline(always)]
fn into_pool_error(err: r2d2::Error) -> trc::Error {
    trc::StoreEvent::PoolError.reason(err)
}

impl SqliteStore {
    /// Runs a blocking closure on the worker pool and awaits its result.
    pub(crate) async fn spawn_worker<U, V>(&self, f: U) -> trc::Result<V>
    where
        U: FnOnce(&Pool<SqliteConnectionManager>) -> trc::Result<V> + Send + 'static,
        V: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let conn_pool = self.conn_pool.clone();

        self.worker_pool.spawn(move || {
            tx.send(f(&conn_pool)).ok();
        });

        match rx.await {
            Ok(result) => result,
            Err(err) => Err(trc::EventType::Server(trc::ServerEvent::ThreadError).reason(err)),
        }
    }
}

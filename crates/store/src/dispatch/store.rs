/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::{Deserialize, IterateParams, Key, Store, write::Batch};
use std::time::Instant;
use trc::{AddContext, StoreEvent};

#[cfg(feature = "test_mode")]
use crate::{SUBSPACES, write::AnyKey};

impl Store {
    pub async fn get_value<U>(&self, key: impl Key) -> trc::Result<Option<U>>
    where
        U: Deserialize + 'static,
    {
        match self {
            #[cfg(feature = "sqlite")]
            Self::SQLite(store) => store.get_value(key).await,
            #[cfg(feature = "postgres")]
            Self::PostgreSQL(store) => store.get_value(key).await,
            #[cfg(feature = "rocks")]
            Self::RocksDb(store) => store.get_value(key).await,
            Self::Memory(store) => store.get_value(key),
            Self::None => Err(trc::StoreEvent::NotConfigured.into()),
        }
        .caused_by(trc::location!())
    }

    pub async fn iterate<T: Key>(
        &self,
        params: IterateParams<T>,
        cb: impl for<'x> FnMut(&'x [u8], &'x [u8]) -> trc::Result<bool> + Sync + Send,
    ) -> trc::Result<()> {
        let start_time = Instant::now();
        let result = match self {
            #[cfg(feature = "sqlite")]
            Self::SQLite(store) => store.iterate(params, cb).await,
            #[cfg(feature = "postgres")]
            Self::PostgreSQL(store) => store.iterate(params, cb).await,
            #[cfg(feature = "rocks")]
            Self::RocksDb(store) => store.iterate(params, cb).await,
            Self::Memory(store) => store.iterate(params, cb),
            Self::None => Err(trc::StoreEvent::NotConfigured.into()),
        }
        .caused_by(trc::location!());

        trc::event!(
            Store(StoreEvent::DataIterate),
            Elapsed = start_time.elapsed(),
        );

        result
    }

    pub async fn write(&self, batch: Batch) -> trc::Result<()> {
        let start_time = Instant::now();
        let ops = batch.len();

        let result = match self {
            #[cfg(feature = "sqlite")]
            Self::SQLite(store) => store.write(batch).await,
            #[cfg(feature = "postgres")]
            Self::PostgreSQL(store) => store.write(batch).await,
            #[cfg(feature = "rocks")]
            Self::RocksDb(store) => store.write(batch).await,
            Self::Memory(store) => store.write(batch),
            Self::None => Err(trc::StoreEvent::NotConfigured.into()),
        };

        trc::event!(
            Store(StoreEvent::DataWrite),
            Elapsed = start_time.elapsed(),
            Total = ops,
        );

        result.caused_by(trc::location!())
    }

    /// Deletes every key between `from` and `to`, both inclusive.
    pub async fn delete_range(&self, from: impl Key, to: impl Key) -> trc::Result<()> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::SQLite(store) => store.delete_range(from, to).await,
            #[cfg(feature = "postgres")]
            Self::PostgreSQL(store) => store.delete_range(from, to).await,
            #[cfg(feature = "rocks")]
            Self::RocksDb(store) => store.delete_range(from, to).await,
            Self::Memory(store) => store.delete_range(from, to),
            Self::None => Err(trc::StoreEvent::NotConfigured.into()),
        }
        .caused_by(trc::location!())
    }

    /// Flushes and releases backend resources. Handles cloned from this one
    /// must not be used afterwards.
    pub async fn close(&self) -> trc::Result<()> {
        let result = match self {
            #[cfg(feature = "sqlite")]
            Self::SQLite(store) => store.close().await,
            #[cfg(feature = "postgres")]
            Self::PostgreSQL(store) => {
                store.close();
                Ok(())
            }
            #[cfg(feature = "rocks")]
            Self::RocksDb(store) => store.close().await,
            Self::Memory(_) => Ok(()),
            Self::None => Err(trc::StoreEvent::NotConfigured.into()),
        }
        .caused_by(trc::location!());

        trc::event!(
            Store(StoreEvent::StoreClosed),
            Type = self.backend_name(),
            Result = &result,
        );

        result
    }

    #[cfg(feature = "test_mode")]
    pub async fn destroy(&self) {
        for subspace in SUBSPACES {
            self.delete_range(
                AnyKey {
                    subspace: *subspace,
                    key: &[] as &[u8],
                },
                AnyKey {
                    subspace: *subspace,
                    key: &[u8::MAX; 32] as &[u8],
                },
            )
            .await
            .unwrap();
        }
    }

    #[cfg(feature = "test_mode")]
    pub async fn assert_is_empty(&self, subspace: u8) {
        let mut keys = Vec::new();
        self.iterate(
            IterateParams::new(
                AnyKey {
                    subspace,
                    key: &[] as &[u8],
                },
                AnyKey {
                    subspace,
                    key: &[u8::MAX; 32] as &[u8],
                },
            )
            .no_values(),
            |key, _| {
                keys.push(key.to_vec());
                Ok(true)
            },
        )
        .await
        .unwrap();

        assert!(
            keys.is_empty(),
            "Subspace {:?} is not empty: {keys:?}",
            char::from(subspace)
        );
    }
}

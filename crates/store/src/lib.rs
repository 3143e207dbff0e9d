/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod backend;
pub mod config;
pub mod dispatch;
pub mod write;

use ahash::AHashMap;
use backend::memory::MemoryStore;
use std::sync::Arc;

#[cfg(feature = "sqlite")]
use backend::sqlite::SqliteStore;

#[cfg(feature = "postgres")]
use backend::postgres::PostgresStore;

#[cfg(feature = "rocks")]
use backend::rocksdb::RocksDbStore;

pub trait Deserialize: Sized + Sync + Send {
    fn deserialize(bytes: &[u8]) -> trc::Result<Self>;

    fn deserialize_owned(bytes: Vec<u8>) -> trc::Result<Self> {
        Self::deserialize(&bytes)
    }
}

pub trait Key: Sync + Send + Clone {
    fn serialize(&self) -> Vec<u8>;
    fn subspace(&self) -> u8;
}

#[derive(Debug, Clone)]
pub struct IterateParams<T: Key> {
    begin: T,
    end: T,
    limit: Option<usize>,
    ascending: bool,
    values: bool,
}

pub const U32_LEN: usize = std::mem::size_of::<u32>();

pub const SUBSPACE_DEAD_LETTER: u8 = b'e';
pub const SUBSPACE_DEAD_LETTER_GROUP: u8 = b'g';

pub const SUBSPACES: &[u8] = &[SUBSPACE_DEAD_LETTER, SUBSPACE_DEAD_LETTER_GROUP];

#[derive(Clone, Default)]
pub struct Stores {
    pub stores: AHashMap<String, Store>,
}

#[derive(Clone, Default)]
pub enum Store {
    #[cfg(feature = "sqlite")]
    SQLite(Arc<SqliteStore>),
    #[cfg(feature = "postgres")]
    PostgreSQL(Arc<PostgresStore>),
    #[cfg(feature = "rocks")]
    RocksDb(Arc<RocksDbStore>),
    Memory(Arc<MemoryStore>),
    #[default]
    None,
}

#[cfg(feature = "sqlite")]
impl From<SqliteStore> for Store {
    fn from(store: SqliteStore) -> Self {
        Self::SQLite(Arc::new(store))
    }
}

#[cfg(feature = "postgres")]
impl From<PostgresStore> for Store {
    fn from(store: PostgresStore) -> Self {
        Self::PostgreSQL(Arc::new(store))
    }
}

#[cfg(feature = "rocks")]
impl From<RocksDbStore> for Store {
    fn from(store: RocksDbStore) -> Self {
        Self::RocksDb(Arc::new(store))
    }
}

impl From<MemoryStore> for Store {
    fn from(store: MemoryStore) -> Self {
        Self::Memory(Arc::new(store))
    }
}

impl Store {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            #[cfg(feature = "sqlite")]
            Self::SQLite(_) => "sqlite",
            #[cfg(feature = "postgres")]
            Self::PostgreSQL(_) => "postgresql",
            #[cfg(feature = "rocks")]
            Self::RocksDb(_) => "rocksdb",
            Self::Memory(_) => "memory",
            Self::None => "none",
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Store").field(&self.backend_name()).finish()
    }
}

impl Deserialize for Vec<u8> {
    fn deserialize(bytes: &[u8]) -> trc::Result<Self> {
        Ok(bytes.to_vec())
    }

    fn deserialize_owned(bytes: Vec<u8>) -> trc::Result<Self> {
        Ok(bytes)
    }
}

impl Deserialize for String {
    fn deserialize(bytes: &[u8]) -> trc::Result<Self> {
        Self::deserialize_owned(bytes.to_vec())
    }

    fn deserialize_owned(bytes: Vec<u8>) -> trc::Result<Self> {
        String::from_utf8(bytes).map_err(|_| {
            trc::StoreEvent::DataCorruption
                .into_err()
                .details("Value is not valid UTF-8")
                .caused_by(trc::location!())
        })
    }
}

impl Deserialize for () {
    fn deserialize(_bytes: &[u8]) -> trc::Result<Self> {
        Ok(())
    }
}

impl<T: Key> IterateParams<T> {
    pub fn new(begin: T, end: T) -> Self {
        IterateParams {
            begin,
            end,
            limit: None,
            ascending: true,
            values: true,
        }
    }

    pub fn set_values(mut self, values: bool) -> Self {
        self.values = values;
        self
    }

    pub fn descending(mut self) -> Self {
        self.ascending = false;
        self
    }

    pub fn only_first(mut self) -> Self {
        self.limit = Some(1);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    pub fn no_values(mut self) -> Self {
        self.values = false;
        self
    }

    pub fn subspace(&self) -> u8 {
        self.begin.subspace()
    }
}

/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use crate::{Store, Stores, backend::memory::MemoryStore};
use utils::config::Config;

#[cfg(feature = "sqlite")]
use crate::backend::sqlite::SqliteStore;

#[cfg(feature = "postgres")]
use crate::backend::postgres::PostgresStore;

#[cfg(feature = "rocks")]
use crate::backend::rocksdb::RocksDbStore;

impl Stores {
    pub async fn parse_all(config: &mut Config) -> Self {
        let mut stores = Stores::default();
        stores.parse_stores(config).await;
        stores
    }

    #[allow(unreachable_patterns)]
    pub async fn parse_stores(&mut self, config: &mut Config) {
        for id in config.sub_keys("store", ".type") {
            let prefix = format!("store.{id}");
            if config
                .property_or_default::<bool>((&prefix, "disable"), "false")
                .unwrap_or(false)
            {
                continue;
            }

            let Some(protocol) = config.value((&prefix, "type")).map(|s| s.to_ascii_lowercase())
            else {
                continue;
            };

            let store: Option<Store> = match protocol.as_str() {
                "memory" => Some(MemoryStore::new().into()),
                #[cfg(feature = "sqlite")]
                "sqlite" => SqliteStore::open(config, &prefix).map(Store::from),
                #[cfg(feature = "postgres")]
                "postgresql" => PostgresStore::open(config, &prefix, true)
                    .await
                    .map(Store::from),
                #[cfg(feature = "rocks")]
                "rocksdb" => RocksDbStore::open(config, &prefix).map(Store::from),
                "sqlite" | "postgresql" | "rocksdb" => {
                    config.new_build_error(
                        (&prefix, "type"),
                        format!(
                            "Store type {protocol:?} is not supported by this build, \
                             enable the corresponding feature"
                        ),
                    );
                    None
                }
                unknown => {
                    config.new_parse_error(
                        (&prefix, "type"),
                        format!("Unknown store type {unknown:?}"),
                    );
                    None
                }
            };

            if let Some(store) = store {
                trc::event!(
                    Store(trc::StoreEvent::StoreOpened),
                    Id = id.clone(),
                    Type = store.backend_name(),
                );
                self.stores.insert(id, store);
            }
        }
    }

    pub fn get_store(&self, id: &str) -> Option<&Store> {
        self.stores.get(id)
    }

    /// Resolves the store referenced by `key`, falling back to the default
    /// data store (`storage.data`) when the key is not set.
    pub fn get_store_or_default(&self, config: &mut Config, key: &str) -> Option<Store> {
        let id = config
            .value(key)
            .or_else(|| config.value("storage.data"))
            .map(|id| id.to_string());

        match id {
            Some(id) => match self.stores.get(&id) {
                Some(store) => Some(store.clone()),
                None => {
                    config.new_build_error(key, format!("Store {id:?} not found"));
                    None
                }
            },
            None => {
                config.new_build_error(key, "Missing store id and no default data store set");
                None
            }
        }
    }
}

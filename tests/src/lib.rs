/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

#[cfg(test)]
pub mod dead_letter;
#[cfg(test)]
pub mod store;

use ::store::{Store, Stores};
use utils::{
    UnwrapFailure,
    config::{Config, tracer::Tracers},
};

pub struct TempDir {
    pub path: std::path::PathBuf,
}

impl TempDir {
    pub fn new(name: &str, delete_if_exists: bool) -> Self {
        let mut path = std::env::temp_dir();
        path.push(name);
        if delete_if_exists && path.exists() {
            std::fs::remove_dir_all(&path).unwrap();
        }
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn delete(&self) {
        std::fs::remove_dir_all(&self.path).unwrap();
    }
}

pub trait AssertConfig {
    fn assert_no_errors(self) -> Self;
}

impl AssertConfig for Config {
    fn assert_no_errors(self) -> Self {
        self.log_errors();
        self.log_warnings();
        if !self.errors.is_empty() {
            panic!("Errors: {:#?}", self.errors);
        }
        if !self.warnings.is_empty() {
            panic!("Warnings: {:#?}", self.warnings);
        }
        self
    }
}

/// Stores under test, taken from the comma separated `STORE` variable or,
/// when unset, the in-memory store plus every backend compiled in.
pub fn store_ids() -> Vec<String> {
    match std::env::var("STORE") {
        Ok(stores) => stores
            .split(',')
            .map(|store| store.trim().to_string())
            .filter(|store| !store.is_empty())
            .collect(),
        Err(_) => {
            let mut stores = vec!["memory".to_string()];
            #[cfg(feature = "sqlite")]
            stores.push("sqlite".to_string());
            #[cfg(feature = "rocks")]
            stores.push("rocksdb".to_string());
            stores
        }
    }
}

pub fn build_store_config(temp_dir: &str, store_ids: &[String]) -> String {
    let mut config = String::new();
    for store_id in store_ids {
        let section = match store_id.as_str() {
            "memory" => MEMORY_CONFIG,
            "sqlite" => SQLITE_CONFIG,
            "rocksdb" => ROCKSDB_CONFIG,
            "postgresql" => POSTGRESQL_CONFIG,
            _ => panic!("Unknown store {store_id:?}"),
        };
        config.push_str(section);
    }

    config.push_str(DEAD_LETTER_CONFIG);
    config
        .replace("{TMP}", temp_dir)
        .replace(
            "{TRACE}",
            if std::env::var("TRACE").is_ok() {
                "true"
            } else {
                "false"
            },
        )
}

/// Opens every requested store, panicking on any configuration problem.
pub async fn open_stores(temp_dir: &TempDir, store_ids: &[String]) -> (Config, Stores) {
    let mut config = Config::new(build_store_config(
        &temp_dir.path.to_string_lossy(),
        store_ids,
    ))
    .failed("Invalid test configuration")
    .assert_no_errors();
    Tracers::parse(&mut config).enable();
    let stores = Stores::parse_all(&mut config).await;
    let config = config.assert_no_errors();

    for store_id in store_ids {
        assert!(
            stores.get_store(store_id).is_some(),
            "Store {store_id:?} not found"
        );
    }

    (config, stores)
}

pub fn get_store(stores: &Stores, store_id: &str) -> Store {
    stores
        .get_store(store_id)
        .cloned()
        .failed(&format!("Store {store_id:?} not found"))
}

const MEMORY_CONFIG: &str = r#"
[store."memory"]
type = "memory"
"#;

const SQLITE_CONFIG: &str = r#"
[store."sqlite"]
type = "sqlite"
path = "{TMP}/sqlite.db"
pool.max-connections = 8
pool.workers = 4
"#;

const ROCKSDB_CONFIG: &str = r#"
[store."rocksdb"]
type = "rocksdb"
path = "{TMP}/rocks.db"
"#;

const POSTGRESQL_CONFIG: &str = r#"
[store."postgresql"]
type = "postgresql"
host = "localhost"
port = 5432
database = "james"
user = "postgres"
password = "mysecretpassword"
timeout = "15s"
pool.max-connections = 10
"#;

const DEAD_LETTER_CONFIG: &str = r#"
[event-bus.dead-letter]
page-size = 7

[tracer."console"]
type = "console"
level = "debug"
enable = {TRACE}
"#;

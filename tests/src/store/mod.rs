/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod ops;

use crate::{TempDir, get_store, open_stores, store_ids};
use store::SUBSPACES;

#[tokio::test(flavor = "multi_thread")]
pub async fn store_tests() {
    let temp_dir = TempDir::new("dead_letter_store_tests", true);
    let store_ids = store_ids();
    let (_, stores) = open_stores(&temp_dir, &store_ids).await;

    for store_id in &store_ids {
        let store = get_store(&stores, store_id);

        println!("Testing store {store_id}...");
        store.destroy().await;
        ops::test(store.clone()).await;

        store.destroy().await;
        for subspace in SUBSPACES {
            store.assert_is_empty(*subspace).await;
        }
        store.close().await.unwrap();
    }

    temp_dir.delete();
}

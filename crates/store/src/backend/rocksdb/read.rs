/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{RocksDbStore, cf_not_found, into_error};
use crate::{Deserialize, IterateParams, Key, backend::subspace_name};
use rocksdb::{Direction, IteratorMode};

impl RocksDbStore {
    pub(crate) async fn get_value<U>(&self, key: impl Key) -> trc::Result<Option<U>>
    where
        U: Deserialize + 'static,
    {
        let subspace = key.subspace();
        let key = key.serialize();

        self.spawn_worker(move |db| {
            let cf = db
                .cf_handle(&subspace_name(subspace))
                .ok_or_else(|| cf_not_found(subspace))?;

            db.get_pinned_cf(&cf, &key)
                .map_err(into_error)?
                .map(|value| U::deserialize(&value))
                .transpose()
        })
        .await
    }

    pub(crate) async fn iterate<T: Key>(
        &self,
        params: IterateParams<T>,
        mut cb: impl for<'x> FnMut(&'x [u8], &'x [u8]) -> trc::Result<bool> + Sync + Send,
    ) -> trc::Result<()> {
        let subspace = params.subspace();
        let begin = params.begin.serialize();
        let end = params.end.serialize();
        let (limit, ascending, values) = (
            params.limit.unwrap_or(usize::MAX),
            params.ascending,
            params.values,
        );

        let rows = self
            .spawn_worker(move |db| {
                let cf = db
                    .cf_handle(&subspace_name(subspace))
                    .ok_or_else(|| cf_not_found(subspace))?;
                let it_mode = if ascending {
                    IteratorMode::From(&begin, Direction::Forward)
                } else {
                    IteratorMode::From(&end, Direction::Reverse)
                };
                let mut results = Vec::new();

                for row in db.iterator_cf(&cf, it_mode) {
                    let (key, value) = row.map_err(into_error)?;
                    if ascending {
                        if key.as_ref() > end.as_slice() {
                            break;
                        }
                    } else if key.as_ref() < begin.as_slice() {
                        break;
                    }

                    results.push((key.into_vec(), if values { value.into_vec() } else { vec![] }));

                    if results.len() >= limit {
                        break;
                    }
                }

                Ok(results)
            })
            .await?;

        for (key, value) in rows {
            if !cb(&key, &value)? {
                break;
            }
        }

        Ok(())
    }
}

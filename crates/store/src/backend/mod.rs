/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "rocks")]
pub mod rocksdb;
#[cfg(feature = "sqlite")]
pub mod sqlite;

/// Smallest key sorting strictly after `key`.
#[inline(always)]
pub fn next_key(key: &[u8]) -> Vec<u8> {
    let mut next = Vec::with_capacity(key.len() + 1);
    next.extend_from_slice(key);
    next.push(0);
    next
}

/// Table or column family holding a subspace.
#[inline(always)]
pub(crate) fn subspace_name(subspace: u8) -> String {
    char::from(subspace).to_string()
}

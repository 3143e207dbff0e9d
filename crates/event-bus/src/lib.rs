/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod codec;
pub mod dead_letter;

pub use codec::{EventSerializer, JsonEventSerializer};
pub use dead_letter::{
    EventDeadLetters,
    health::{DeadLetterHealthCheck, HealthStatus},
};

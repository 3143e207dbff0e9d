/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt::Display, str::FromStr};

/// Name of an event bus listener group.
///
/// Groups are assigned by humans and persisted as part of dead letter keys,
/// so the name must stay stable across restarts. Any non-empty string is a
/// valid group name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "CompactString", into = "CompactString")]
#[repr(transparent)]
pub struct Group(CompactString);

impl Group {
    pub fn new(name: impl Into<CompactString>) -> trc::Result<Self> {
        let name = name.into();
        if !name.is_empty() {
            Ok(Group(name))
        } else {
            Err(trc::EventBusEvent::InvalidGroup
                .into_err()
                .details("Group name cannot be empty")
                .caused_by(trc::location!()))
        }
    }

    /// Rebuilds a group from its persisted representation.
    pub fn from_bytes(bytes: &[u8]) -> trc::Result<Self> {
        std::str::from_utf8(bytes)
            .map_err(|_| trc::Error::corrupted("group name is not valid UTF-8"))
            .and_then(|name| {
                if !name.is_empty() {
                    Ok(Group(name.into()))
                } else {
                    Err(trc::Error::corrupted("empty group name"))
                }
            })
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Group {
    type Err = trc::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Group::new(s)
    }
}

impl TryFrom<CompactString> for Group {
    type Error = trc::Error;

    fn try_from(value: CompactString) -> Result<Self, Self::Error> {
        Group::new(value)
    }
}

impl From<Group> for CompactString {
    fn from(value: Group) -> Self {
        value.0
    }
}

impl AsRef<str> for Group {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Borrow<str> for Group {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&Group> for trc::Value {
    fn from(value: &Group) -> Self {
        trc::Value::String(value.0.clone())
    }
}

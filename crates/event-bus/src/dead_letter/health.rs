/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::EventDeadLetters;
use crate::codec::EventSerializer;
use futures::TryStreamExt;
use serde::Serialize;
use trc::EventBusEvent;
use types::Group;

pub const COMPONENT_NAME: &str = "EventDeadLettersHealthCheck";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded { groups: Vec<Group> },
    Unhealthy { reason: String },
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// Reports the dead letter store as degraded while any listener group has
/// failed events waiting for redelivery.
pub struct DeadLetterHealthCheck<S: EventSerializer> {
    dead_letters: EventDeadLetters<S>,
}

impl<S: EventSerializer> DeadLetterHealthCheck<S> {
    pub fn new(dead_letters: EventDeadLetters<S>) -> Self {
        Self { dead_letters }
    }

    pub fn component_name(&self) -> &'static str {
        COMPONENT_NAME
    }

    pub async fn check(&self) -> HealthStatus {
        match self
            .dead_letters
            .groups_with_failed_events()
            .try_collect::<Vec<_>>()
            .await
        {
            Ok(groups) if groups.is_empty() => HealthStatus::Healthy,
            Ok(groups) => {
                trc::event!(
                    EventBus(EventBusEvent::HealthDegraded),
                    Total = groups.len(),
                    Details = groups
                        .iter()
                        .map(trc::Value::from)
                        .collect::<Vec<_>>(),
                );
                HealthStatus::Degraded { groups }
            }
            Err(err) => HealthStatus::Unhealthy {
                reason: err.to_string(),
            },
        }
    }
}

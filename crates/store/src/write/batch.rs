/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use super::{Batch, BatchBuilder, MAX_BATCH_OPS, MAX_BATCH_SIZE, Operation, ValueClass, ValueOp};

impl BatchBuilder {
    pub fn new() -> Self {
        Self {
            ops: Vec::with_capacity(16),
            batch_size: 0,
        }
    }

    pub fn set(&mut self, class: impl Into<ValueClass>, value: impl Into<Vec<u8>>) -> &mut Self {
        let class = class.into();
        let value = value.into();
        self.batch_size += class.serialized_size() + value.len();
        self.ops.push(Operation::Value {
            class,
            op: ValueOp::Set(value),
        });
        self
    }

    pub fn clear(&mut self, class: impl Into<ValueClass>) -> &mut Self {
        let class = class.into();
        self.batch_size += class.serialized_size();
        self.ops.push(Operation::Value {
            class,
            op: ValueOp::Clear,
        });
        self
    }

    pub fn is_large_batch(&self) -> bool {
        self.ops.len() >= MAX_BATCH_OPS || self.batch_size >= MAX_BATCH_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn build_all(&mut self) -> Batch {
        self.batch_size = 0;
        Batch {
            ops: std::mem::take(&mut self.ops),
        }
    }
}

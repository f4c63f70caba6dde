#![deny(missing_docs)]
//! Interface crate to unify how the costs of tree operations are passed and
//! retrieved.
//!
//! Every operation that hashes, allocates nodes or reads content reports what
//! it did through an [`OperationCost`] attached to its return value with a
//! [`CostContext`].

pub mod context;

use std::ops::{Add, AddAssign};

pub use context::{CostContext, CostResult, CostsExt};

/// Approximate amount of work done by a tree operation.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct OperationCost {
    /// How many times a content source was read.
    pub content_reads: u64,
    /// How many bytes were loaded from content sources.
    pub content_loaded_bytes: u64,
    /// How many times raw content was hashed (leaf digests).
    pub hash_byte_calls: u64,
    /// How many times two child digests were hashed into a parent.
    pub hash_node_calls: u64,
    /// How many nodes were allocated in the tree arena.
    pub nodes_created: u64,
}

impl OperationCost {
    /// Cost of one content read of `len` bytes.
    pub fn with_content_read(len: usize) -> Self {
        OperationCost {
            content_reads: 1,
            content_loaded_bytes: len as u64,
            ..Default::default()
        }
    }

    /// Helper function to build default `OperationCost` with different
    /// `hash_byte_calls`.
    pub fn with_hash_byte_calls(hash_byte_calls: u64) -> Self {
        OperationCost {
            hash_byte_calls,
            ..Default::default()
        }
    }
}

impl Add for OperationCost {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        OperationCost {
            content_reads: self.content_reads + rhs.content_reads,
            content_loaded_bytes: self.content_loaded_bytes + rhs.content_loaded_bytes,
            hash_byte_calls: self.hash_byte_calls + rhs.hash_byte_calls,
            hash_node_calls: self.hash_node_calls + rhs.hash_node_calls,
            nodes_created: self.nodes_created + rhs.nodes_created,
        }
    }
}

impl AddAssign for OperationCost {
    fn add_assign(&mut self, rhs: Self) {
        self.content_reads += rhs.content_reads;
        self.content_loaded_bytes += rhs.content_loaded_bytes;
        self.hash_byte_calls += rhs.hash_byte_calls;
        self.hash_node_calls += rhs.hash_node_calls;
        self.nodes_created += rhs.nodes_created;
    }
}

/// Macro to achieve a kind of what `?` operator does, but with `CostContext` on
/// top. Main properties are:
/// 1. Early termination on error;
/// 2. Because of 1. `Result` is removed from the equation;
/// 3. `CostContext` is removed too because it is added to the external cost
///    accumulator;
/// 4. Early termination uses the external cost accumulator so previous costs
///    won't be lost.
#[macro_export]
macro_rules! cost_return_on_error {
    ( &mut $cost:ident, $($body:tt)+ ) => {
        {
            use $crate::CostsExt;
            let result_with_cost = { $($body)+ };
            let result = result_with_cost.unwrap_add_cost(&mut $cost);
            match result {
                Ok(x) => x,
                Err(e) => return Err(e.into()).wrap_with_cost($cost),
            }
        }
    };
}

/// Same as [`cost_return_on_error`] but for a plain `Result`: nothing is added
/// to the accumulator, previously accumulated costs are returned on error.
#[macro_export]
macro_rules! cost_return_on_error_no_add {
    ( &$cost:ident, $($body:tt)+ ) => {
        {
            use $crate::CostsExt;
            let result = { $($body)+ };
            match result {
                Ok(x) => x,
                Err(e) => return Err(e.into()).wrap_with_cost($cost),
            }
        }
    };
}

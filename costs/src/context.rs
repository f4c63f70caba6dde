//! Values travelling together with the work spent producing them.

use crate::OperationCost;

/// A value and the cost of computing it.
#[must_use]
#[derive(Debug, Eq, PartialEq)]
pub struct CostContext<T> {
    /// What the operation produced.
    pub value: T,
    /// Work the operation did.
    pub cost: OperationCost,
}

impl<T> CostContext<T> {
    /// Move the cost into `acc` and return the value.
    pub fn unwrap_add_cost(self, acc: &mut OperationCost) -> T {
        *acc += self.cost;
        self.value
    }

    /// Return the value, discarding the cost.
    pub fn unwrap(self) -> T {
        self.value
    }

    /// Transform the value, cost unchanged.
    pub fn map<B>(self, f: impl FnOnce(T) -> B) -> CostContext<B> {
        CostContext {
            value: f(self.value),
            cost: self.cost,
        }
    }

    /// Fold in work done before this context was created.
    pub fn add_cost(mut self, cost: OperationCost) -> Self {
        self.cost += cost;
        self
    }
}

/// A fallible operation together with its cost. The cost is reported on
/// failure too.
pub type CostResult<T, E> = CostContext<Result<T, E>>;

/// Attach a cost to any value.
pub trait CostsExt: Sized {
    /// Pair `self` with `cost`.
    fn wrap_with_cost(self, cost: OperationCost) -> CostContext<Self> {
        CostContext { value: self, cost }
    }
}

impl<T> CostsExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_add_cost_accumulates() {
        let mut acc = OperationCost::with_hash_byte_calls(1);
        let value = "leaf"
            .wrap_with_cost(OperationCost::with_content_read(4))
            .unwrap_add_cost(&mut acc);
        assert_eq!(value, "leaf");
        assert_eq!(acc.hash_byte_calls, 1);
        assert_eq!(acc.content_reads, 1);
        assert_eq!(acc.content_loaded_bytes, 4);
    }

    #[test]
    fn test_map_and_add_cost() {
        let ctx: CostResult<u32, ()> = 7u32
            .wrap_with_cost(OperationCost::with_hash_byte_calls(2))
            .map(Ok)
            .add_cost(OperationCost::with_content_read(3));
        assert_eq!(ctx.value, Ok(7));
        assert_eq!(ctx.cost.hash_byte_calls, 2);
        assert_eq!(ctx.cost.content_loaded_bytes, 3);
    }
}

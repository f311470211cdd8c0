//! Collective communication between the ranks of a partitioned run.
//!
//! Every rank must call the same collectives in the same order; a rank that
//! skips one blocks the others forever. There are no timeouts.

mod local;
mod serial;

pub use local::{LocalCluster, LocalCommunicator};
pub use serial::SerialCommunicator;

use crate::types::RankIndex;

/// Reduction applied by [`Communicator::all_reduce_f64`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReduceOp {
    Min,
    Max,
    Sum,
}

impl ReduceOp {
    /// Identity element of the reduction.
    pub fn identity(self) -> f64 {
        match self {
            ReduceOp::Min => f64::INFINITY,
            ReduceOp::Max => f64::NEG_INFINITY,
            ReduceOp::Sum => 0.0,
        }
    }

    /// Combine two values.
    ///
    /// Min and Max propagate NaN so a poisoned value on one rank is seen by
    /// every rank.
    #[inline]
    pub fn combine(self, a: f64, b: f64) -> f64 {
        if a.is_nan() || b.is_nan() {
            return match self {
                ReduceOp::Sum => a + b,
                _ => f64::NAN,
            };
        }
        match self {
            ReduceOp::Min => a.min(b),
            ReduceOp::Max => a.max(b),
            ReduceOp::Sum => a + b,
        }
    }

    /// Reduce a slice of values.
    pub fn reduce(self, values: &[f64]) -> f64 {
        values
            .iter()
            .fold(self.identity(), |acc, &v| self.combine(acc, v))
    }
}

/// Blocking collectives over a fixed set of ranks.
pub trait Communicator {
    /// This process's rank.
    fn rank(&self) -> RankIndex;

    /// Number of ranks.
    fn size(&self) -> usize;

    /// Reduce one value per rank; every rank receives the result.
    fn all_reduce_f64(&self, value: f64, op: ReduceOp) -> f64;

    /// Logical OR of one flag per rank; every rank receives the result.
    fn all_reduce_or(&self, flag: bool) -> bool {
        let reduced = self.all_reduce_f64(if flag { 1.0 } else { 0.0 }, ReduceOp::Max);
        reduced > 0.0
    }

    /// Block until every rank arrives.
    fn barrier(&self);

    /// True on the rank that emits global log messages.
    fn is_root(&self) -> bool {
        self.rank().as_usize() == 0
    }

    /// Global minimum of a local field; +inf for an empty field everywhere.
    fn global_min(&self, field: &[f64]) -> f64 {
        self.all_reduce_f64(ReduceOp::Min.reduce(field), ReduceOp::Min)
    }

    /// Global maximum of a local field; -inf for an empty field everywhere.
    fn global_max(&self, field: &[f64]) -> f64 {
        self.all_reduce_f64(ReduceOp::Max.reduce(field), ReduceOp::Max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_ops() {
        let values = [3.0, -1.0, 2.0];
        assert_eq!(ReduceOp::Min.reduce(&values), -1.0);
        assert_eq!(ReduceOp::Max.reduce(&values), 3.0);
        assert_eq!(ReduceOp::Sum.reduce(&values), 4.0);
        assert_eq!(ReduceOp::Min.reduce(&[]), f64::INFINITY);
    }

    #[test]
    fn test_nan_propagates() {
        assert!(ReduceOp::Min.reduce(&[1.0, f64::NAN, 0.0]).is_nan());
        assert!(ReduceOp::Max.reduce(&[f64::NAN, 1.0]).is_nan());
    }
}

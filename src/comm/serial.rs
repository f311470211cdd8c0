use super::{Communicator, ReduceOp};
use crate::types::RankIndex;

/// Single-rank communicator: every collective is the identity.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialCommunicator;

impl Communicator for SerialCommunicator {
    fn rank(&self) -> RankIndex {
        RankIndex::new(0)
    }

    fn size(&self) -> usize {
        1
    }

    fn all_reduce_f64(&self, value: f64, _op: ReduceOp) -> f64 {
        value
    }

    fn all_reduce_or(&self, flag: bool) -> bool {
        flag
    }

    fn barrier(&self) {}
}

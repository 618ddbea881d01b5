//! 调度输入
//!
//! 由 root coordinator 在指定时刻投递给模型的外部输入，及其优先级比较。

use super::time::SimTime;
use std::cmp::Ordering;

/// 调度输入，包含投递时间、序列号和输入值。
pub struct ScheduledInput<I> {
    pub(crate) at: SimTime,
    pub(crate) seq: u64,
    pub(crate) input: I,
}

// BinaryHeap 是 max-heap；我们需要最小时间优先，因此反向比较。
// SimTime 是 f64，用 total_cmp 得到全序（NaN 在入队前已被拒绝）。
impl<I> Ord for ScheduledInput<I> {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.at.0.total_cmp(&other.at.0) {
            Ordering::Equal => self.seq.cmp(&other.seq),
            ord => ord,
        }
        .reverse()
    }
}

impl<I> PartialOrd for ScheduledInput<I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I> PartialEq for ScheduledInput<I> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<I> Eq for ScheduledInput<I> {}

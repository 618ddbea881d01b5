//! 原子模型 trait
//!
//! 定义 DEVS 原子模型的能力集合：time advance、输出函数以及内部/外部/汇合迁移。

use crate::sim::SimTime;
use thiserror::Error;

/// 模型自身的失败（状态非法、输入不合法等）。仿真器不解释，只附上模型名透传。
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct ModelError {
    reason: String,
}

impl ModelError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// 原子模型
pub trait Component {
    /// 外部输入（由 coordinator 在 transition 之前投递）
    type Input;
    /// 输出函数 λ 产生的值
    type Output;

    /// 模型名称（用于日志和错误）
    fn name(&self) -> &str;

    /// 检查并建立初始状态，在仿真器 `initialize` 时调用一次。
    fn initialize(&mut self) -> Result<(), ModelError> {
        Ok(())
    }

    /// 距离下一次内部事件的时长，非负或 `SimTime::INFINITY`。不得修改状态。
    fn time_advance(&self) -> SimTime;

    /// 输出函数 λ：基于当前状态（迁移之前）产生输出。
    fn output(&self) -> Vec<Self::Output>;

    /// 内部迁移 δint
    fn internal_transition(&mut self) -> Result<(), ModelError>;

    /// 外部迁移 δext，`elapsed` 为自上次事件以来经过的时间。
    fn external_transition(
        &mut self,
        elapsed: SimTime,
        inputs: &[Self::Input],
    ) -> Result<(), ModelError>;

    /// 汇合迁移 δcon：输入恰好在内部事件时刻到达。
    ///
    /// 默认先做内部迁移，再以 elapsed = 0 做外部迁移。
    fn confluent_transition(&mut self, inputs: &[Self::Input]) -> Result<(), ModelError> {
        self.internal_transition()?;
        self.external_transition(SimTime::ZERO, inputs)
    }

    /// 仿真结束时的清理钩子
    fn exit(&mut self) {}
}

//! 仿真错误
//!
//! 定义仿真核心可能返回的错误类型。模型自身的失败以 [`ModelError`] 透传。

use super::simulator::Phase;
use super::time::SimTime;
use crate::modeling::ModelError;
use thiserror::Error;

/// 仿真核心错误
#[derive(Debug, Error)]
pub enum SimError {
    /// 因果性破坏：迁移时刻早于上一次事件时刻。
    #[error("causality violation: transition at {t} is earlier than t_last={t_last}")]
    CausalityViolation { t: SimTime, t_last: SimTime },

    /// 生命周期误用（例如未初始化就 collect，或 exit 之后继续调用）。
    #[error("lifecycle misuse: `{op}` is not allowed in phase {phase:?}")]
    Lifecycle { op: &'static str, phase: Phase },

    /// 模型返回了负数或 NaN 的 time advance。
    #[error("model `{model}` returned invalid time advance {ta}")]
    InvalidTimeAdvance { model: String, ta: SimTime },

    /// 非法时刻（NaN）。
    #[error("invalid simulation time {t}")]
    InvalidTime { t: SimTime },

    /// 实时节拍倍率必须有限且非负。
    #[error("invalid real-time scale {scale}")]
    InvalidTimeScale { scale: f64 },

    /// 虚拟时钟不允许回退。
    #[error("clock regression: cannot move clock from {now} back to {t}")]
    ClockRegression { now: SimTime, t: SimTime },

    /// 实时模式下墙钟落后目标时刻超过允许的抖动。
    #[error("real-time pacing lagged {lag:?} behind simulation time {t}")]
    RealTimeLag { t: SimTime, lag: std::time::Duration },

    /// 没有输入却在 `t_next` 之后迁移：内部事件会被错过。
    #[error("missed internal event: transition at {t} is past t_next={t_next} with no input")]
    MissedEvent { t: SimTime, t_next: SimTime },

    /// 模型自身的失败，原样透传。
    #[error("model `{model}` failed")]
    Model {
        model: String,
        #[source]
        source: ModelError,
    },
}

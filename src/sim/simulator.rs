//! 仿真器
//!
//! 单个 DEVS 原子模型的抽象仿真器：维护上次事件时间 `t_last` 与下次事件时间
//! `t_next`，按 coordinator 的调用驱动模型的生命周期
//! （initialize → collect/transition 循环 → exit）。
//!
//! 不变式：
//! - 初始化之后始终有 `t_last <= t_next`；
//! - `t_next` 只来自迁移后重新查询模型的 time advance；
//! - `transition(t)` 不接受 `t < t_last`，被拒绝的调用不修改任何时间状态。

use super::clock::Clock;
use super::error::SimError;
use super::time::SimTime;
use crate::modeling::Component;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// 仿真器生命周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// 已构造，尚未 `initialize`
    Uninitialized,
    /// 已初始化，等待下一轮 collect / transition
    Ready,
    /// 本轮已 collect，输出缓冲中可能有待路由的输出
    Collected,
    /// 已 `exit`，只允许只读访问
    Exited,
}

/// 一次 `transition` 实际执行的迁移类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Internal,
    External,
    Confluent,
    /// 既不 imminent 也没有输入：模型无事件，时间状态不变
    Idle,
}

/// Coordinator 调用的仿真器契约（对象安全，便于持有异构仿真器）。
pub trait AbstractSimulator {
    /// 所驱动模型的名称
    fn name(&self) -> &str;

    /// 初始化：`t_last = clock.now()`，`t_next = t_last + ta()`。
    fn initialize(&mut self) -> Result<(), SimError>;

    /// 结束仿真，释放仿真器本地状态（不销毁模型）。
    fn exit(&mut self) -> Result<(), SimError>;

    /// 模型当前的 time advance。
    fn ta(&self) -> Result<SimTime, SimError>;

    /// 若模型 imminent（`clock.now() == t_next`）则调用输出函数。
    fn collect(&mut self) -> Result<(), SimError>;

    /// 在时刻 `t` 执行内部/外部/汇合迁移，并更新 `t_last`、`t_next`。
    fn transition(&mut self, t: SimTime) -> Result<TransitionKind, SimError>;

    /// 丢弃本轮未提交的输入与输出，不改变时间状态。
    fn clear(&mut self) -> Result<(), SimError>;

    fn t_last(&self) -> SimTime;
    fn set_t_last(&mut self, t: SimTime) -> Result<(), SimError>;
    fn t_next(&self) -> SimTime;
    fn set_t_next(&mut self, t: SimTime) -> Result<(), SimError>;

    /// 共享时钟句柄
    fn clock(&self) -> Arc<dyn Clock>;

    /// 以 `Any` 形式访问所驱动的模型，持有 `dyn AbstractSimulator` 的 coordinator
    /// 可以 `downcast_ref` 回具体模型类型。
    fn model_any(&self) -> &dyn Any;
}

/// 抽象仿真器：借用一个模型，持有共享时钟。
pub struct Simulator<'m, M: Component> {
    model: &'m mut M,
    clock: Arc<dyn Clock>,
    t_last: SimTime,
    t_next: SimTime,
    phase: Phase,
    inputs: Vec<M::Input>,
    outputs: Vec<M::Output>,
}

impl<'m, M: Component> Simulator<'m, M> {
    /// 绑定时钟与模型，处于 `Uninitialized` 阶段。
    pub fn new(clock: Arc<dyn Clock>, model: &'m mut M) -> Self {
        Self {
            model,
            clock,
            t_last: SimTime::ZERO,
            t_next: SimTime::INFINITY,
            phase: Phase::Uninitialized,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// 只读访问所驱动的模型
    pub fn model(&self) -> &M {
        &*self.model
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// 投递一个外部输入，在下一次 `transition` 时消费。
    pub fn inject(&mut self, input: M::Input) -> Result<(), SimError> {
        self.require_running("inject")?;
        self.inputs.push(input);
        Ok(())
    }

    pub fn has_pending_input(&self) -> bool {
        !self.inputs.is_empty()
    }

    /// 最近一次 `collect` 产生的输出
    pub fn outputs(&self) -> &[M::Output] {
        &self.outputs
    }

    /// 取走输出缓冲（coordinator 路由用）
    pub fn take_outputs(&mut self) -> Vec<M::Output> {
        std::mem::take(&mut self.outputs)
    }

    fn require_running(&self, op: &'static str) -> Result<(), SimError> {
        match self.phase {
            Phase::Ready | Phase::Collected => Ok(()),
            phase => {
                warn!(model = %self.model.name(), op, ?phase, "生命周期误用");
                Err(SimError::Lifecycle { op, phase })
            }
        }
    }

    fn require_not_exited(&self, op: &'static str) -> Result<(), SimError> {
        if self.phase == Phase::Exited {
            return Err(SimError::Lifecycle {
                op,
                phase: Phase::Exited,
            });
        }
        Ok(())
    }

    fn model_err(&self, source: crate::modeling::ModelError) -> SimError {
        SimError::Model {
            model: self.model.name().to_string(),
            source,
        }
    }
}

impl<M: Component + 'static> AbstractSimulator for Simulator<'_, M> {
    fn name(&self) -> &str {
        self.model.name()
    }

    #[tracing::instrument(skip(self), fields(model = %self.model.name()))]
    fn initialize(&mut self) -> Result<(), SimError> {
        if self.phase != Phase::Uninitialized {
            return Err(SimError::Lifecycle {
                op: "initialize",
                phase: self.phase,
            });
        }
        self.model
            .initialize()
            .map_err(|e| self.model_err(e))?;

        let start = self.clock.now();
        if !start.is_valid_instant() {
            return Err(SimError::InvalidTime { t: start });
        }
        let ta = self.ta()?;
        self.t_last = start;
        self.t_next = start + ta;
        self.phase = Phase::Ready;

        debug!(t_last = %self.t_last, t_next = %self.t_next, "🚀 仿真器已初始化");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(model = %self.model.name()))]
    fn exit(&mut self) -> Result<(), SimError> {
        self.require_running("exit")?;
        self.inputs = Vec::new();
        self.outputs = Vec::new();
        self.model.exit();
        self.phase = Phase::Exited;
        debug!(t_last = %self.t_last, t_next = %self.t_next, "仿真器已退出");
        Ok(())
    }

    fn ta(&self) -> Result<SimTime, SimError> {
        self.require_not_exited("ta")?;
        let ta = self.model.time_advance();
        if !ta.is_valid_advance() {
            warn!(model = %self.model.name(), ta = %ta, "非法 time advance");
            return Err(SimError::InvalidTimeAdvance {
                model: self.model.name().to_string(),
                ta,
            });
        }
        Ok(ta)
    }

    #[tracing::instrument(skip(self), fields(model = %self.model.name()))]
    fn collect(&mut self) -> Result<(), SimError> {
        self.require_running("collect")?;
        let now = self.clock.now();
        if now == self.t_next {
            self.outputs = self.model.output();
            trace!(now = %now, outputs = self.outputs.len(), "📤 收集输出");
        } else {
            // 非 imminent：不产生输出
            self.outputs.clear();
            trace!(now = %now, t_next = %self.t_next, "模型未到期，跳过输出");
        }
        self.phase = Phase::Collected;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(model = %self.model.name()))]
    fn transition(&mut self, t: SimTime) -> Result<TransitionKind, SimError> {
        self.require_running("transition")?;
        if !t.is_valid_instant() {
            return Err(SimError::InvalidTime { t });
        }
        if t < self.t_last {
            warn!(t_last = %self.t_last, "⛔ 拒绝时间回退的迁移");
            return Err(SimError::CausalityViolation {
                t,
                t_last: self.t_last,
            });
        }

        let imminent = t == self.t_next;
        let kind = match (imminent, self.inputs.is_empty()) {
            (true, true) => TransitionKind::Internal,
            (true, false) => TransitionKind::Confluent,
            (false, false) => TransitionKind::External,
            (false, true) => TransitionKind::Idle,
        };

        if kind == TransitionKind::Idle {
            if t > self.t_next {
                warn!(t_next = %self.t_next, "⛔ 迁移时刻已越过 t_next 且无输入，拒绝跳过内部事件");
                return Err(SimError::MissedEvent {
                    t,
                    t_next: self.t_next,
                });
            }
            trace!("无事件，保持时间状态");
            self.phase = Phase::Ready;
            return Ok(kind);
        }

        let inputs = std::mem::take(&mut self.inputs);
        let applied = match kind {
            TransitionKind::Internal => self.model.internal_transition(),
            TransitionKind::Confluent => self.model.confluent_transition(&inputs),
            TransitionKind::External => {
                let elapsed = t - self.t_last;
                self.model.external_transition(elapsed, &inputs)
            }
            TransitionKind::Idle => Ok(()),
        };
        applied.map_err(|e| self.model_err(e))?;

        let ta = self.ta()?;
        self.t_last = t;
        self.t_next = t + ta;
        self.outputs.clear();
        self.phase = Phase::Ready;

        debug!(?kind, inputs = inputs.len(), t_last = %self.t_last, t_next = %self.t_next, "🔁 迁移完成");
        Ok(kind)
    }

    fn clear(&mut self) -> Result<(), SimError> {
        self.require_running("clear")?;
        self.inputs.clear();
        self.outputs.clear();
        self.phase = Phase::Ready;
        Ok(())
    }

    fn t_last(&self) -> SimTime {
        self.t_last
    }

    fn set_t_last(&mut self, t: SimTime) -> Result<(), SimError> {
        self.require_not_exited("set_t_last")?;
        trace!(model = %self.model.name(), from = %self.t_last, to = %t, "强制对齐 t_last");
        self.t_last = t;
        Ok(())
    }

    fn t_next(&self) -> SimTime {
        self.t_next
    }

    fn set_t_next(&mut self, t: SimTime) -> Result<(), SimError> {
        self.require_not_exited("set_t_next")?;
        trace!(model = %self.model.name(), from = %self.t_next, to = %t, "强制对齐 t_next");
        self.t_next = t;
        Ok(())
    }

    fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    fn model_any(&self) -> &dyn Any {
        &*self.model
    }
}

//! Root coordinator
//!
//! 驱动单个仿真器的顶层循环：推进共享时钟、（可选）实时节拍、collect、
//! 投递到期的外部输入、transition、clear。它是时钟唯一的写者。
//! 不负责模型之间的事件路由。

use super::clock::{Clock, VirtualClock};
use super::error::SimError;
use super::scheduled_input::ScheduledInput;
use super::simulator::{AbstractSimulator, Simulator};
use super::time::SimTime;
use crate::modeling::Component;
use crate::trace::{TraceEvent, TraceEventKind, TraceLogger};
use std::collections::BinaryHeap;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// 一次运行的汇总
#[derive(Debug)]
pub struct RunReport<O> {
    /// 执行的迁移轮数
    pub steps: u64,
    /// 结束时的时钟读数
    pub final_time: SimTime,
    /// 按时间顺序收集到的输出
    pub outputs: Vec<(SimTime, O)>,
}

pub struct RootCoordinator<'m, M: Component> {
    sim: Simulator<'m, M>,
    clock: Arc<VirtualClock>,
    pacer: Option<Arc<dyn Clock>>,
    next_seq: u64,
    pending: BinaryHeap<ScheduledInput<M::Input>>,
    trace: Option<TraceLogger>,
}

impl<'m, M: Component + 'static> RootCoordinator<'m, M> {
    pub fn new(clock: Arc<VirtualClock>, model: &'m mut M) -> Self {
        let shared: Arc<dyn Clock> = clock.clone();
        Self {
            sim: Simulator::new(shared, model),
            clock,
            pacer: None,
            next_seq: 0,
            pending: BinaryHeap::new(),
            trace: None,
        }
    }

    /// 使用实时时钟节拍（每轮迁移前 `wait_until`）
    pub fn with_pacer(mut self, pacer: Arc<dyn Clock>) -> Self {
        self.pacer = Some(pacer);
        self
    }

    /// 记录结构化轨迹
    pub fn with_trace(mut self) -> Self {
        self.trace = Some(TraceLogger::default());
        self
    }

    pub fn simulator(&self) -> &Simulator<'m, M> {
        &self.sim
    }

    pub fn trace(&self) -> Option<&TraceLogger> {
        self.trace.as_ref()
    }

    pub fn pending_inputs(&self) -> usize {
        self.pending.len()
    }

    /// 调度一个外部输入在 `at` 时刻投递。不能早于当前时钟。
    pub fn schedule_input(&mut self, at: SimTime, input: M::Input) -> Result<(), SimError> {
        if !at.is_valid_instant() || at.is_infinite() {
            return Err(SimError::InvalidTime { t: at });
        }
        let now = self.clock.now();
        if at < now {
            return Err(SimError::CausalityViolation { t: at, t_last: now });
        }
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.pending.push(ScheduledInput { at, seq, input });
        trace!(at = %at, seq, queue_size = self.pending.len(), "调度外部输入");
        Ok(())
    }

    /// 运行直到下一事件时刻 `>= t_end`，随后退出仿真器。
    pub fn simulate(&mut self, t_end: SimTime) -> Result<RunReport<M::Output>, SimError> {
        self.run(t_end, u64::MAX)
    }

    /// 最多执行 `steps` 轮迁移，随后退出仿真器。
    pub fn simulate_steps(&mut self, steps: u64) -> Result<RunReport<M::Output>, SimError> {
        self.run(SimTime::INFINITY, steps)
    }

    fn next_event_time(&self) -> SimTime {
        let t_next = self.sim.t_next();
        match self.pending.peek() {
            Some(top) if top.at < t_next => top.at,
            _ => t_next,
        }
    }

    #[tracing::instrument(skip(self), fields(model = %self.sim.name()))]
    fn run(&mut self, t_end: SimTime, max_steps: u64) -> Result<RunReport<M::Output>, SimError> {
        if !t_end.is_valid_instant() {
            return Err(SimError::InvalidTime { t: t_end });
        }
        info!("▶️  开始运行仿真");
        self.sim.initialize()?;
        self.record(self.sim.t_last(), TraceEventKind::Init);

        let mut report = RunReport {
            steps: 0,
            final_time: self.sim.t_last(),
            outputs: Vec::new(),
        };

        while report.steps < max_steps {
            let t = self.next_event_time();
            if t.is_infinite() || t >= t_end {
                break;
            }
            self.step(t, &mut report)?;
        }

        if !t_end.is_infinite() && self.clock.now() < t_end {
            self.clock.advance_to(t_end)?;
        }
        report.final_time = self.clock.now();

        self.sim.exit()?;
        self.record(report.final_time, TraceEventKind::Exit);

        info!(
            total_steps = report.steps,
            final_time = %report.final_time,
            outputs = report.outputs.len(),
            "✅ 仿真完成"
        );
        Ok(report)
    }

    fn step(&mut self, t: SimTime, report: &mut RunReport<M::Output>) -> Result<(), SimError> {
        self.clock.advance_to(t)?;
        if let Some(pacer) = &self.pacer {
            pacer.wait_until(t)?;
        }

        self.sim.collect()?;
        let outs = self.sim.take_outputs();
        if !outs.is_empty() {
            self.record(t, TraceEventKind::Output { count: outs.len() });
            report.outputs.extend(outs.into_iter().map(|o| (t, o)));
        }

        while self.pending.peek().is_some_and(|p| p.at <= t) {
            if let Some(item) = self.pending.pop() {
                self.sim.inject(item.input)?;
            }
        }

        let kind = self.sim.transition(t)?;
        self.record(t, TraceEventKind::Transition { transition: kind });
        self.sim.clear()?;

        report.steps += 1;
        debug!(
            step = report.steps,
            t = %t,
            ?kind,
            t_next = %self.sim.t_next(),
            remaining_inputs = self.pending.len(),
            "执行一轮"
        );
        Ok(())
    }

    fn record(&mut self, t: SimTime, kind: TraceEventKind) {
        if let Some(log) = self.trace.as_mut() {
            log.push(TraceEvent::new(t, self.sim.name(), self.sim.t_next(), kind));
        }
    }
}

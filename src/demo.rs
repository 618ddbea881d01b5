//! 演示模型和示例代码
//!
//! 包含两个参考原子模型（周期发生器、单服务台处理器）以及把二者串起来运行的
//! 辅助函数。两段仿真依次运行：发生器的输出按时间调度为处理器的外部输入。

use crate::modeling::{Component, ModelError};
use crate::sim::{Clock, RealTimeClock, RootCoordinator, SimError, SimTime, VirtualClock};
use crate::trace::TraceEvent;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// 在模型之间传递的作业
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
}

/// 发生器控制命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorCmd {
    /// 停止发送，进入被动状态
    Stop,
}

/// 周期发生器：每隔 `period` 发出一个 Job，发满 `max_jobs` 后被动。
#[derive(Debug)]
pub struct Generator {
    name: String,
    period: SimTime,
    max_jobs: Option<u64>,
    sigma: SimTime,
    next_id: u64,
}

impl Generator {
    pub fn new(name: impl Into<String>, period: SimTime, max_jobs: Option<u64>) -> Self {
        Self {
            name: name.into(),
            period,
            max_jobs,
            sigma: period,
            next_id: 0,
        }
    }

    /// 已发出的 Job 数
    pub fn emitted(&self) -> u64 {
        self.next_id
    }

    fn exhausted(&self) -> bool {
        self.max_jobs.is_some_and(|max| self.next_id >= max)
    }
}

impl Component for Generator {
    type Input = GeneratorCmd;
    type Output = Job;

    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) -> Result<(), ModelError> {
        if self.period.0.is_nan() || self.period.0 <= 0.0 || self.period.is_infinite() {
            return Err(ModelError::new(format!(
                "period must be positive and finite, got {}",
                self.period
            )));
        }
        self.next_id = 0;
        self.sigma = if self.exhausted() {
            SimTime::INFINITY
        } else {
            self.period
        };
        Ok(())
    }

    fn time_advance(&self) -> SimTime {
        self.sigma
    }

    fn output(&self) -> Vec<Job> {
        vec![Job { id: self.next_id }]
    }

    fn internal_transition(&mut self) -> Result<(), ModelError> {
        self.next_id += 1;
        self.sigma = if self.exhausted() {
            SimTime::INFINITY
        } else {
            self.period
        };
        Ok(())
    }

    fn external_transition(
        &mut self,
        elapsed: SimTime,
        inputs: &[GeneratorCmd],
    ) -> Result<(), ModelError> {
        if inputs.contains(&GeneratorCmd::Stop) {
            self.sigma = SimTime::INFINITY;
        } else {
            self.sigma = self.sigma - elapsed;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ProcessorState {
    Idle,
    Busy { job: Job, sigma: SimTime },
}

/// 单服务台处理器：空闲时接收 Job，忙碌 `service_time` 后输出；忙碌期间到达的 Job 被丢弃。
#[derive(Debug)]
pub struct Processor {
    name: String,
    service_time: SimTime,
    state: ProcessorState,
    processed: u64,
    dropped: u64,
}

impl Processor {
    pub fn new(name: impl Into<String>, service_time: SimTime) -> Self {
        Self {
            name: name.into(),
            service_time,
            state: ProcessorState::Idle,
            processed: 0,
            dropped: 0,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, ProcessorState::Busy { .. })
    }

    pub fn current_job(&self) -> Option<Job> {
        match self.state {
            ProcessorState::Busy { job, .. } => Some(job),
            ProcessorState::Idle => None,
        }
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Component for Processor {
    type Input = Job;
    type Output = Job;

    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) -> Result<(), ModelError> {
        if !self.service_time.is_valid_advance() || self.service_time.is_infinite() {
            return Err(ModelError::new(format!(
                "service time must be non-negative and finite, got {}",
                self.service_time
            )));
        }
        self.state = ProcessorState::Idle;
        self.processed = 0;
        self.dropped = 0;
        Ok(())
    }

    fn time_advance(&self) -> SimTime {
        match self.state {
            ProcessorState::Idle => SimTime::INFINITY,
            ProcessorState::Busy { sigma, .. } => sigma,
        }
    }

    fn output(&self) -> Vec<Job> {
        self.current_job().into_iter().collect()
    }

    fn internal_transition(&mut self) -> Result<(), ModelError> {
        if !self.is_busy() {
            return Err(ModelError::new("internal transition while idle"));
        }
        self.state = ProcessorState::Idle;
        self.processed += 1;
        Ok(())
    }

    fn external_transition(&mut self, elapsed: SimTime, inputs: &[Job]) -> Result<(), ModelError> {
        match self.state {
            ProcessorState::Busy { job, sigma } => {
                self.state = ProcessorState::Busy {
                    job,
                    sigma: sigma - elapsed,
                };
                self.dropped += inputs.len() as u64;
            }
            ProcessorState::Idle => {
                if let Some((first, rest)) = inputs.split_first() {
                    self.state = ProcessorState::Busy {
                        job: *first,
                        sigma: self.service_time,
                    };
                    self.dropped += rest.len() as u64;
                }
            }
        }
        Ok(())
    }
}

/// 发生器 → 处理器 流水线配置（CLI 的 `--config` JSON 也使用此结构）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOpts {
    /// 发生器周期（秒）
    pub period: f64,
    /// 处理器服务时间（秒）
    pub service_time: f64,
    /// 最多生成的 Job 数
    pub max_jobs: Option<u64>,
    /// 仿真结束时刻（秒）
    pub until: f64,
    /// 实时节拍：每仿真秒对应的墙钟秒数；None 表示尽快运行
    pub time_scale: Option<f64>,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self {
            period: 1.0,
            service_time: 0.5,
            max_jobs: None,
            until: 10.0,
            time_scale: None,
        }
    }
}

/// 流水线运行结果
#[derive(Debug, Default)]
pub struct PipelineSummary {
    pub generated: u64,
    pub processed: u64,
    pub dropped: u64,
    pub final_time: SimTime,
    /// 处理器输出的完成 Job 及时刻
    pub completed: Vec<(SimTime, Job)>,
    pub trace: Vec<TraceEvent>,
}

fn pacer_for(
    clock: &Arc<VirtualClock>,
    opts: &PipelineOpts,
) -> Result<Option<Arc<dyn Clock>>, SimError> {
    let Some(scale) = opts.time_scale else {
        return Ok(None);
    };
    let rt: Arc<dyn Clock> = Arc::new(RealTimeClock::new(
        Arc::clone(clock),
        scale,
        Duration::from_millis(50),
    )?);
    Ok(Some(rt))
}

/// 运行发生器 → 处理器 流水线
pub fn run_pipeline(opts: &PipelineOpts, with_trace: bool) -> Result<PipelineSummary, SimError> {
    let until = SimTime::from_secs(opts.until);
    info!(?opts, "构建流水线");

    // 第一段：发生器
    let mut generator = Generator::new("generator", SimTime::from_secs(opts.period), opts.max_jobs);
    let gen_clock = VirtualClock::shared(SimTime::ZERO);
    let mut gen_root = RootCoordinator::new(Arc::clone(&gen_clock), &mut generator);
    if let Some(p) = pacer_for(&gen_clock, opts)? {
        gen_root = gen_root.with_pacer(p);
    }
    if with_trace {
        gen_root = gen_root.with_trace();
    }
    let gen_report = gen_root.simulate(until)?;
    let mut trace = gen_root
        .trace()
        .map(|log| log.events.clone())
        .unwrap_or_default();
    drop(gen_root);
    debug!(jobs = gen_report.outputs.len(), "发生器完成");

    // 第二段：处理器，发生器输出作为调度输入
    let mut processor = Processor::new("processor", SimTime::from_secs(opts.service_time));
    let proc_clock = VirtualClock::shared(SimTime::ZERO);
    let mut proc_root = RootCoordinator::new(Arc::clone(&proc_clock), &mut processor);
    if let Some(p) = pacer_for(&proc_clock, opts)? {
        proc_root = proc_root.with_pacer(p);
    }
    if with_trace {
        proc_root = proc_root.with_trace();
    }
    for (at, job) in &gen_report.outputs {
        proc_root.schedule_input(*at, *job)?;
    }
    let proc_report = proc_root.simulate(until)?;
    if let Some(log) = proc_root.trace() {
        trace.extend(log.events.iter().cloned());
    }
    drop(proc_root);

    // 两段各自按时间有序，合并后稳定排序
    trace.sort_by(|a, b| a.t.total_cmp(&b.t));

    Ok(PipelineSummary {
        generated: generator.emitted(),
        processed: processor.processed(),
        dropped: processor.dropped(),
        final_time: proc_report.final_time,
        completed: proc_report.outputs,
        trace,
    })
}

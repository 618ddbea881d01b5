//! 仿真时钟
//!
//! 所有仿真器共享同一个时钟读取“当前仿真时间”。只有顶层驱动（root
//! coordinator）通过 [`VirtualClock::advance_to`] 推进时间，仿真器只读。

use super::error::SimError;
use super::time::SimTime;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// 时钟接口
pub trait Clock: Send + Sync {
    /// 当前仿真时间（单调不减）
    fn now(&self) -> SimTime;

    /// 实时模式下阻塞直到墙钟到达 `t` 对应的时刻；纯虚拟时钟直接返回。
    fn wait_until(&self, _t: SimTime) -> Result<(), SimError> {
        Ok(())
    }
}

/// 虚拟时钟：以原子方式保存 f64 位模式，可在多个仿真器间共享读取。
#[derive(Debug)]
pub struct VirtualClock {
    bits: AtomicU64,
}

impl VirtualClock {
    pub fn new(start: SimTime) -> Self {
        Self {
            bits: AtomicU64::new(start.0.to_bits()),
        }
    }

    /// 构造一个可共享的时钟句柄
    pub fn shared(start: SimTime) -> Arc<Self> {
        Arc::new(Self::new(start))
    }

    /// 将时钟推进到 `t`。时间不能回退，也不能是 NaN。
    pub fn advance_to(&self, t: SimTime) -> Result<(), SimError> {
        if !t.is_valid_instant() {
            return Err(SimError::InvalidTime { t });
        }
        let now = self.now();
        if t < now {
            warn!(now = %now, t = %t, "⏪ 拒绝时钟回退");
            return Err(SimError::ClockRegression { now, t });
        }
        trace!(from = %now, to = %t, "推进虚拟时钟");
        self.bits.store(t.0.to_bits(), Ordering::Release);
        Ok(())
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new(SimTime::ZERO)
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> SimTime {
        SimTime(f64::from_bits(self.bits.load(Ordering::Acquire)))
    }
}

/// 实时时钟：读时间委托给内部虚拟时钟，`wait_until` 按 `time_scale` 映射到墙钟并睡眠。
///
/// `time_scale` 为每个仿真秒对应的墙钟秒数（1.0 即实时，0.5 即两倍速）。
#[derive(Debug)]
pub struct RealTimeClock {
    inner: Arc<VirtualClock>,
    anchor: Instant,
    origin: SimTime,
    time_scale: f64,
    max_jitter: Duration,
}

impl RealTimeClock {
    /// 以当前墙钟时刻和虚拟时钟读数作为对齐锚点。`time_scale` 必须有限且非负。
    pub fn new(
        inner: Arc<VirtualClock>,
        time_scale: f64,
        max_jitter: Duration,
    ) -> Result<Self, SimError> {
        if !time_scale.is_finite() || time_scale < 0.0 {
            return Err(SimError::InvalidTimeScale { scale: time_scale });
        }
        let origin = inner.now();
        Ok(Self {
            inner,
            anchor: Instant::now(),
            origin,
            time_scale,
            max_jitter,
        })
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    fn wall_offset(&self, t: SimTime) -> Result<Duration, SimError> {
        let secs = ((t.0 - self.origin.0) * self.time_scale).max(0.0);
        Duration::try_from_secs_f64(secs).map_err(|_| SimError::InvalidTime { t })
    }
}

impl Clock for RealTimeClock {
    fn now(&self) -> SimTime {
        self.inner.now()
    }

    fn wait_until(&self, t: SimTime) -> Result<(), SimError> {
        if !t.is_valid_instant() || t.is_infinite() {
            return Err(SimError::InvalidTime { t });
        }
        let target = self
            .anchor
            .checked_add(self.wall_offset(t)?)
            .ok_or(SimError::InvalidTime { t })?;
        let now = Instant::now();
        if now < target {
            let wait = target - now;
            debug!(t = %t, wait_ms = wait.as_millis() as u64, "⏳ 实时等待");
            std::thread::sleep(wait);
            return Ok(());
        }
        let lag = now - target;
        if lag > self.max_jitter {
            warn!(t = %t, lag_ms = lag.as_millis() as u64, "实时节拍落后");
            return Err(SimError::RealTimeLag { t, lag });
        }
        Ok(())
    }
}

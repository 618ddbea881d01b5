//! 仿真时间类型
//!
//! 定义仿真时间（秒，f64）及其单位转换。`INFINITY` 表示“不再有内部事件”。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// 仿真时间（秒）。既可表示时刻，也可表示时长（time advance / elapsed）。
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);
    pub const INFINITY: SimTime = SimTime(f64::INFINITY);

    pub fn from_secs(s: f64) -> SimTime {
        SimTime(s)
    }
    pub fn from_millis(ms: f64) -> SimTime {
        SimTime(ms / 1_000.0)
    }
    pub fn from_micros(us: f64) -> SimTime {
        SimTime(us / 1_000_000.0)
    }

    pub fn as_secs(self) -> f64 {
        self.0
    }

    pub fn is_infinite(self) -> bool {
        self.0 == f64::INFINITY
    }

    /// 可作为时刻使用（非 NaN）。
    pub fn is_valid_instant(self) -> bool {
        !self.0.is_nan()
    }

    /// 可作为 time advance 使用：非 NaN 且非负（允许 +inf）。
    pub fn is_valid_advance(self) -> bool {
        !self.0.is_nan() && self.0 >= 0.0
    }
}

impl Add for SimTime {
    type Output = SimTime;

    // inf + 有限值 仍为 inf，被动模型保持被动。
    fn add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 + rhs.0)
    }
}

impl Sub for SimTime {
    type Output = SimTime;

    fn sub(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 - rhs.0)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinite() {
            write!(f, "inf")
        } else {
            write!(f, "{}s", self.0)
        }
    }
}

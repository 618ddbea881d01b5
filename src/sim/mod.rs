//! 仿真核心模块
//!
//! 此模块包含 DEVS 抽象仿真器及其依赖：仿真时间、共享时钟、错误类型和 root coordinator。

// 子模块声明
mod clock;
mod error;
mod root;
mod scheduled_input;
mod simulator;
mod time;

// 重新导出公共接口
pub use clock::{Clock, RealTimeClock, VirtualClock};
pub use error::SimError;
pub use root::{RootCoordinator, RunReport};
pub use scheduled_input::ScheduledInput;
pub use simulator::{AbstractSimulator, Phase, Simulator, TransitionKind};
pub use time::SimTime;

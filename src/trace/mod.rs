//! 仿真运行轨迹记录（结构化 JSON，便于离线检查）
//!
//! - **结构化**：用 JSON 事件而不是解析文本日志
//! - **轻量**：只记录生命周期与迁移，不复制模型状态

mod types;

pub use types::{TraceEvent, TraceEventKind, TraceLogger};

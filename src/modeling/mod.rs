//! 建模接口
//!
//! 仿真器驱动的原子模型（component）契约。模型的状态、端口和迁移逻辑由
//! 实现方负责，仿真器只通过这里的入口调用。

mod component;

pub use component::{Component, ModelError};

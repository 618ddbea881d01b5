use crate::sim::{SimTime, TransitionKind};
use serde::{Deserialize, Serialize};

/// 轨迹事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEventKind {
    /// 仿真器完成初始化（建议作为第一条事件）
    Init,
    /// collect 阶段模型产生了输出
    Output { count: usize },
    /// 一次迁移（包括 idle）
    Transition { transition: TransitionKind },
    /// 仿真器退出
    Exit,
}

/// 单条轨迹事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub t: f64,
    pub model: String,
    /// 事件之后的 t_next；被动模型（+inf）记为 None，因为 JSON 不能表示无穷大
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_next: Option<f64>,
    #[serde(flatten)]
    pub kind: TraceEventKind,
}

impl TraceEvent {
    pub fn new(t: SimTime, model: impl Into<String>, t_next: SimTime, kind: TraceEventKind) -> Self {
        Self {
            t: t.as_secs(),
            model: model.into(),
            t_next: (!t_next.is_infinite()).then_some(t_next.as_secs()),
            kind,
        }
    }
}

#[derive(Debug, Default)]
pub struct TraceLogger {
    pub events: Vec<TraceEvent>,
}

impl TraceLogger {
    pub fn push(&mut self, ev: TraceEvent) {
        self.events.push(ev);
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }
}

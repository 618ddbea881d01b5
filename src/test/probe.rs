use crate::modeling::{Component, ModelError};
use crate::sim::SimTime;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Init,
    Internal,
    External { elapsed: SimTime, inputs: Vec<u32> },
    Confluent { inputs: Vec<u32> },
    Exit,
}

/// 脚本化测试模型：每次迁移后 time advance 取 `script` 的下一个值。
#[derive(Debug)]
pub(crate) struct Probe {
    pub ta: SimTime,
    pub script: VecDeque<SimTime>,
    pub calls: Vec<Call>,
    pub fail_init: bool,
    pub fail_transition: bool,
    pub transitions: u32,
}

impl Probe {
    pub fn new(ta: f64) -> Self {
        Self {
            ta: SimTime(ta),
            script: VecDeque::new(),
            calls: Vec::new(),
            fail_init: false,
            fail_transition: false,
            transitions: 0,
        }
    }

    pub fn then(mut self, ta: f64) -> Self {
        self.script.push_back(SimTime(ta));
        self
    }

    fn advance_script(&mut self) -> Result<(), ModelError> {
        if self.fail_transition {
            return Err(ModelError::new("probe transition failure"));
        }
        self.transitions += 1;
        if let Some(next) = self.script.pop_front() {
            self.ta = next;
        }
        Ok(())
    }
}

impl Component for Probe {
    type Input = u32;
    type Output = u32;

    fn name(&self) -> &str {
        "probe"
    }

    fn initialize(&mut self) -> Result<(), ModelError> {
        self.calls.push(Call::Init);
        if self.fail_init {
            return Err(ModelError::new("bad initial state"));
        }
        Ok(())
    }

    fn time_advance(&self) -> SimTime {
        self.ta
    }

    fn output(&self) -> Vec<u32> {
        vec![self.transitions]
    }

    fn internal_transition(&mut self) -> Result<(), ModelError> {
        self.calls.push(Call::Internal);
        self.advance_script()
    }

    fn external_transition(&mut self, elapsed: SimTime, inputs: &[u32]) -> Result<(), ModelError> {
        self.calls.push(Call::External {
            elapsed,
            inputs: inputs.to_vec(),
        });
        self.advance_script()
    }

    fn confluent_transition(&mut self, inputs: &[u32]) -> Result<(), ModelError> {
        self.calls.push(Call::Confluent {
            inputs: inputs.to_vec(),
        });
        self.advance_script()
    }

    fn exit(&mut self) {
        self.calls.push(Call::Exit);
    }
}

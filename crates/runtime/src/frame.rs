use crate::environment::EnvId;
use crate::value::Value;

/// One activation on the call stack: the environment the body runs in and
/// whatever `return` has stored so far.
#[derive(Debug, Clone)]
pub struct Frame {
    env: EnvId,
    state: FrameState,
}

impl Frame {
    pub fn new(env: EnvId) -> Self {
        Frame {
            env,
            state: FrameState::default(),
        }
    }

    pub fn get_env(&self) -> EnvId {
        self.env
    }

    pub fn get_return_value(&self) -> Option<&Value> {
        self.state.return_value.as_ref()
    }

    pub fn set_return_value(&mut self, value: Value) {
        self.state.return_value = Some(value);
    }

    pub fn take_return_value(&mut self) -> Option<Value> {
        self.state.return_value.take()
    }

    pub fn is_state_dirty(&self) -> bool {
        self.state.return_value.is_some()
    }
}

#[derive(Debug, Clone, Default)]
struct FrameState {
    return_value: Option<Value>,
}

use thiserror::Error;

use crate::environment::EnvId;
use crate::frame::Frame;
use crate::value::Value;

/// Call stack: the top-level frame plus one frame per active invocation.
#[derive(Debug)]
pub struct Stack {
    global: Frame,
    frames: Vec<Frame>,
    max_depth: usize,
}

impl Stack {
    pub fn new(global_env: EnvId, max_depth: usize) -> Self {
        Stack {
            global: Frame::new(global_env),
            frames: vec![],
            max_depth,
        }
    }

    pub fn push(&mut self, frame: Frame) -> Result<(), StackError> {
        if self.frames.len() >= self.max_depth {
            return Err(StackError::Overflow(self.max_depth));
        }

        self.frames.push(frame);

        Ok(())
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Number of active invocations.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn set_return_value(&mut self, value: Value) {
        self.get_innermost_frame_mut().set_return_value(value);
    }

    pub fn has_return_value(&self) -> bool {
        self.get_innermost_frame().is_state_dirty()
    }

    pub fn consume_return_value(&mut self) -> Option<Value> {
        self.get_innermost_frame_mut().take_return_value()
    }

    pub fn global(&self) -> &Frame {
        &self.global
    }

    /// Environments of the top-level frame and every active invocation.
    pub fn envs(&self) -> impl Iterator<Item = EnvId> + '_ {
        std::iter::once(&self.global)
            .chain(self.frames.iter())
            .map(Frame::get_env)
    }
}

impl Stack {
    fn get_innermost_frame(&self) -> &Frame {
        self.frames.last().unwrap_or(&self.global)
    }

    fn get_innermost_frame_mut(&mut self) -> &mut Frame {
        self.frames.last_mut().unwrap_or(&mut self.global)
    }
}

#[derive(Error, Debug, PartialEq, Clone)]
pub enum StackError {
    #[error("maximum call depth of {0} exceeded")]
    Overflow(usize),
}

/// How direct calls treat a mismatch between declared parameters and the
/// arguments supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArityMode {
    /// Missing parameters are bound to `undefined`, extra arguments ignored.
    #[default]
    Lenient,
    /// Calls to user functions without a trailing collector must supply
    /// exactly the declared number of arguments.
    Strict,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub max_call_depth: usize,
    pub arity: ArityMode,
}

impl RuntimeConfig {
    pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

    pub fn new() -> Self {
        Self {
            max_call_depth: Self::DEFAULT_MAX_CALL_DEPTH,
            arity: ArityMode::default(),
        }
    }

    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn arity(mut self, mode: ArityMode) -> Self {
        self.arity = mode;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}

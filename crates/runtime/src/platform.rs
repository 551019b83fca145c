use std::fmt::Debug;

/// Where the sandbox sends output.
pub trait Platform: Debug {
    fn println(&self, message: &str);
    fn write(&self, message: &str);
}

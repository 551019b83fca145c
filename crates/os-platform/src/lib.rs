use std::io::Write;

/// Writes to the process's standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Platform;

impl kestrel_runtime::Platform for Platform {
    fn println(&self, message: &str) {
        println!("{}", message);
    }

    fn write(&self, message: &str) {
        print!("{}", message);
        let _ = std::io::stdout().flush();
    }
}

pub mod runtime {
    pub use ::kestrel_runtime::*;
}

pub mod syntax {
    pub use ::kestrel_syntax::*;
}

pub mod prelude {
    pub use ::kestrel_prelude::*;
}

pub mod platform {
    pub use ::kestrel_os_platform::Platform as OSPlatform;
}

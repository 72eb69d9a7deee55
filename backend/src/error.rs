use thiserror::Error;

/// Fatal failures while bringing the surface up. None of them are retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BootstrapError {
    #[error("windowing subsystem initialization failed: {0}")]
    SurfaceInit(String),

    #[error("could not create a current OpenGL context: {0}")]
    ContextCreation(String),

    #[error("OpenGL entry points could not be resolved")]
    LoaderFailed,

    #[error("OpenGL {major}.{minor} is below the required 2.0")]
    UnsupportedVersion { major: u32, minor: u32 },

    #[error("event loop failure: {0}")]
    EventLoop(String),
}

impl BootstrapError {
    pub fn exit_code(&self) -> i32 {
        -1
    }
}

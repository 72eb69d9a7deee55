pub mod bootstrap;
pub mod capability;
pub mod config;
pub mod error;
pub mod frame;
pub mod gfx;
pub mod loader;
pub mod logging;
pub mod surface;
pub mod system;

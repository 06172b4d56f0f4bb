//! Configuration module for android_controller
//!
//! This module contains:
//! - `tools`: Paths of the external executables and the target device serial
//! - `stream`: Option set for the mirroring tool

mod stream;
mod tools;

pub use stream::StreamOptions;
pub use tools::ControllerConfig;

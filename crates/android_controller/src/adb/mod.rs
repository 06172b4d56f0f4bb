//! ADB (Android Debug Bridge) operations
//!
//! This module provides:
//! - `connection`: Attached device listing
//! - `device`: Touch gestures (tap, swipe)
//! - `input`: Text input handling
//! - `properties`: Property queries and descriptor assembly
//! - `screenshot`: Screenshot capture

mod connection;
mod device;
mod input;
mod properties;
mod screenshot;

pub use connection::{list_devices, parse_device_list, AttachedDevice, ConnectionType};
pub use device::{swipe, tap, Point, DEFAULT_SWIPE_DURATION_MS};
pub use input::{shell_quote, type_text};
pub use properties::{
    density_or_default, parse_density, parse_screen_info, probe_device, screen_dimensions,
};
pub use screenshot::{screenshot, Screenshot};

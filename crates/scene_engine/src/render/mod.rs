//! Graphic driver boundary
//!
//! The scene core never talks to a graphics API directly. Everything it needs
//! is the small matrix-stack interface in [`GraphicDriver`]; platform backends
//! implement it elsewhere. Two headless implementations live here:
//! - [`NullGraphicDriver`] ignores every call
//! - [`RecordingDriver`] records calls and simulates the matrix stack

mod color;
mod driver;
mod null_driver;
mod recording;

pub use color::Color;
pub use driver::GraphicDriver;
pub use null_driver::NullGraphicDriver;
pub use recording::{DriverCall, DriverStats, RecordingDriver};

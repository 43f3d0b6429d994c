//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types (2D vectors)
//! - Handle-based collections for body storage
//! - Clocks for the fixed-timestep loop
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;

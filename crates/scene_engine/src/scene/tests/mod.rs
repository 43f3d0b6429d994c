//! Scheduling and render scenario tests for the scene module

mod support;
mod render_phase;

//! Clipforge - validated ffmpeg media operations
//!
//! This library crate exposes the configuration and job runner for
//! integration testing.

pub mod config;
pub mod pipeline;

//! Core types for the animated button.
//!
//! This crate contains shared data structures that are used across all crates:
//! - Button states and the legal transition graph
//! - Views, sizes, opacity and animation descriptions
//! - Configuration types
//! - Error types

mod config;
mod error;
mod state;
mod visual;

pub use config::{
    config_dir, config_path, ButtonConfig, DEFAULT_AUTO_TRANSITION,
    DEFAULT_TRANSITION_DURATION_MS,
};
pub use error::{ButtonError, ConfigError, RunnerError};
pub use state::{ButtonState, IllegalTransition, Transition};
pub use visual::{AnimatedProperty, Animation, Choreography, Opacity, Resize, Size, View};

//! Animation sequencing core for the animated button.
//!
//! This crate provides:
//! - `TransitionRunner` - issues one transition's resize and cross-fade
//! - `ButtonStateMachine` - commits states on settle and holds one pending request
//! - `AnimatedButton` - the public show/click surface
//! - `ViewHost` - the host platform seen by the core
//! - `SimulatedHost` - a manual-clock host for tests and headless runs

pub mod host;
pub mod machine;
pub mod runner;
pub mod sim;
pub mod widget;

pub use host::{AnimationTicket, Parts, SessionId, ViewHost};
pub use machine::{ButtonSnapshot, ButtonStateMachine, Request, RequestOutcome};
pub use runner::{AnimationSession, Completion, RunOutcome, TransitionRunner};
pub use sim::{HostEvent, SimulatedHost};
pub use widget::{AnimatedButton, ClickEvent, ClickListener};

// Re-export animbutton_core types for convenience
pub use animbutton_core::{
    Animation, ButtonConfig, ButtonState, IllegalTransition, Opacity, Size, Transition, View,
};

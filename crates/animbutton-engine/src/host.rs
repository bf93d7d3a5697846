//! The host platform as seen by the animation core.
//!
//! The core never interpolates anything itself. It measures views, sets
//! properties immediately when no animation is wanted, and hands sub-animations
//! to the host together with a ticket. The host reports each ticket back exactly
//! once through the owner's `on_animation_end`, on the owner's execution context.

use animbutton_core::{Animation, Opacity, Size, View};
use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Sub-animations of one session.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Parts: u8 {
        const RESIZE = 0b001;
        const FADE_OUT = 0b010;
        const FADE_IN = 0b100;
    }
}

/// Identifier of one transition session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Completion token for a single sub-animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationTicket {
    pub session: SessionId,
    pub part: Parts,
}

impl fmt::Display for AnimationTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = if self.part == Parts::RESIZE {
            "resize"
        } else if self.part == Parts::FADE_OUT {
            "fade_out"
        } else if self.part == Parts::FADE_IN {
            "fade_in"
        } else {
            "?"
        };
        write!(f, "{}/{}", self.session, part)
    }
}

/// Host platform operations.
#[cfg_attr(test, mockall::automock)]
pub trait ViewHost {
    /// Last measured size of a view.
    fn measure(&self, view: View) -> Size;

    /// Set a view's opacity without animating.
    fn set_opacity(&mut self, view: View, opacity: Opacity);

    /// Set a view's width without animating.
    fn set_width(&mut self, view: View, width: u32);

    /// Enable or disable the interaction surface.
    fn set_interactive(&mut self, interactive: bool);

    /// Start an animation. Its completion must be reported with `ticket`.
    fn animate(&mut self, ticket: AnimationTicket, animation: Animation);
}

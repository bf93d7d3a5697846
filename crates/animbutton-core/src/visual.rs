//! Visual primitives shared by the runner and its hosts.
//!
//! Opacity follows the conventional mapping everywhere: `1.0` is fully shown,
//! `0.0` is hidden.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A view owned by the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// The resizable container.
    Body,
    Label,
    Spinner,
    SuccessGlyph,
    FailureGlyph,
}

impl View {
    /// The child visuals that cross-fade. `Body` is never faded.
    pub const CONTENT: [View; 4] = [
        View::Label,
        View::Spinner,
        View::SuccessGlyph,
        View::FailureGlyph,
    ];
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Body => "body",
            View::Label => "label",
            View::Spinner => "spinner",
            View::SuccessGlyph => "success_glyph",
            View::FailureGlyph => "failure_glyph",
        };
        f.write_str(name)
    }
}

/// Measured size of a view in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

// =============================================================================
// Opacity
// =============================================================================

/// Opacity in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32")]
pub struct Opacity(f32);

impl Opacity {
    pub const HIDDEN: Opacity = Opacity(0.0);
    pub const SHOWN: Opacity = Opacity(1.0);

    /// Create an opacity, clamping into range. NaN becomes hidden.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::HIDDEN;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn is_shown(self) -> bool {
        self.0 >= 1.0
    }

    pub fn is_hidden(self) -> bool {
        self.0 <= 0.0
    }
}

impl From<f32> for Opacity {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self::HIDDEN
    }
}

impl fmt::Display for Opacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// =============================================================================
// Choreography
// =============================================================================

/// Direction of the body resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resize {
    /// Collapse the body to a square whose side is its height.
    Shrink,
    /// Restore the width captured at the last shrink.
    Expand,
}

/// The sub-animations of one transition.
///
/// The resize (if any) and the cross-fade are issued together and are
/// unordered relative to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choreography {
    pub resize: Option<Resize>,
    pub fade_out: View,
    pub fade_in: View,
}

// =============================================================================
// Animation
// =============================================================================

/// Property animated by a single host animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimatedProperty {
    Width { from: u32, to: u32 },
    Opacity { to: Opacity },
}

/// One sub-animation handed to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub view: View,
    pub property: AnimatedProperty,
    pub duration: Duration,
}

impl Animation {
    pub fn width(view: View, from: u32, to: u32, duration: Duration) -> Self {
        Self {
            view,
            property: AnimatedProperty::Width { from, to },
            duration,
        }
    }

    pub fn opacity(view: View, to: Opacity, duration: Duration) -> Self {
        Self {
            view,
            property: AnimatedProperty::Opacity { to },
            duration,
        }
    }
}

impl fmt::Display for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.property {
            AnimatedProperty::Width { from, to } => write!(
                f,
                "{} width {}->{} over {}ms",
                self.view,
                from,
                to,
                self.duration.as_millis()
            ),
            AnimatedProperty::Opacity { to } => write!(
                f,
                "{} opacity ->{} over {}ms",
                self.view,
                to,
                self.duration.as_millis()
            ),
        }
    }
}

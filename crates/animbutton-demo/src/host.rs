//! Host backed by tokio timers.
//!
//! Animations jump to their final value when their timer fires, then report
//! the ticket back to the button's runtime thread.

use animbutton_core::{AnimatedProperty, Animation, Opacity, Size, View};
use animbutton_engine::{AnimationTicket, ViewHost};
use animbutton_runtime::CompletionSender;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// View properties shared between the host and its timer tasks.
#[derive(Debug, Default)]
pub struct Surface {
    sizes: HashMap<View, Size>,
    opacities: HashMap<View, Opacity>,
    interactive: bool,
}

impl Surface {
    pub fn new(body: Size) -> Self {
        let mut surface = Self::default();
        surface.sizes.insert(View::Body, body);
        surface
    }

    pub fn size(&self, view: View) -> Size {
        self.sizes.get(&view).copied().unwrap_or_default()
    }

    pub fn opacity(&self, view: View) -> Opacity {
        self.opacities.get(&view).copied().unwrap_or_default()
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// The content view currently shown, if exactly one is.
    pub fn shown(&self) -> Option<View> {
        let mut shown = View::CONTENT
            .into_iter()
            .filter(|view| self.opacity(*view).is_shown());
        match (shown.next(), shown.next()) {
            (Some(view), None) => Some(view),
            _ => None,
        }
    }

    fn apply(&mut self, animation: &Animation) {
        match animation.property {
            AnimatedProperty::Width { to, .. } => {
                self.sizes.entry(animation.view).or_default().width = to;
            }
            AnimatedProperty::Opacity { to } => {
                self.opacities.insert(animation.view, to);
            }
        }
    }
}

pub type SharedSurface = Arc<Mutex<Surface>>;

pub struct TimerHost {
    surface: SharedSurface,
    completions: CompletionSender,
    rt: tokio::runtime::Handle,
}

impl TimerHost {
    pub fn new(
        surface: SharedSurface,
        completions: CompletionSender,
        rt: tokio::runtime::Handle,
    ) -> Self {
        Self {
            surface,
            completions,
            rt,
        }
    }
}

impl ViewHost for TimerHost {
    fn measure(&self, view: View) -> Size {
        self.surface.lock().size(view)
    }

    fn set_opacity(&mut self, view: View, opacity: Opacity) {
        self.surface.lock().opacities.insert(view, opacity);
    }

    fn set_width(&mut self, view: View, width: u32) {
        self.surface.lock().sizes.entry(view).or_default().width = width;
    }

    fn set_interactive(&mut self, interactive: bool) {
        self.surface.lock().interactive = interactive;
    }

    fn animate(&mut self, ticket: AnimationTicket, animation: Animation) {
        tracing::debug!("Animating {}: {}", ticket, animation);
        let surface = self.surface.clone();
        let completions = self.completions.clone();

        self.rt.spawn(async move {
            tokio::time::sleep(animation.duration).await;
            surface.lock().apply(&animation);
            if let Err(e) = completions.animation_ended(ticket) {
                tracing::warn!("Dropping completion {}: {}", ticket, e);
            }
        });
    }
}

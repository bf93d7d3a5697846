//! Button state machine.
//!
//! Serializes transitions so that at most one choreography is in flight. The
//! committed state only changes when a choreography settles. A request that
//! arrives while busy lands in a single pending slot, replacing whatever was
//! there, and is replayed the moment the in-flight session settles.
//!
//! Every mutation broadcasts a [`ButtonSnapshot`] so observers cannot miss a
//! change.

use animbutton_core::{
    ButtonConfig, ButtonState, IllegalTransition, Opacity, Transition, View,
};
use serde::Serialize;
use tokio::sync::watch;

use crate::host::{AnimationTicket, ViewHost};
use crate::runner::{Completion, RunOutcome, TransitionRunner};

/// Something a caller can ask of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "target", rename_all = "lowercase")]
pub enum Request {
    /// Move to a state through the transition graph.
    Show(ButtonState),
    /// Jump straight back to Normal without animating.
    Reset,
}

/// What happened to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The choreography for this edge was started.
    Started(Transition),
    /// The edge had nothing to animate and was committed at once.
    Committed(Transition),
    /// A choreography is in flight; the request now occupies the pending slot.
    Deferred { replaced: Option<Request> },
    /// No edge from the committed state. Dropped on purpose.
    Ignored(IllegalTransition),
    /// Reset was applied immediately.
    Reset,
}

/// Observable state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ButtonSnapshot {
    pub state: ButtonState,
    pub animating: bool,
    pub pending: Option<Request>,
}

/// Owns the committed state and the single pending slot.
pub struct ButtonStateMachine<H> {
    host: H,
    runner: TransitionRunner,
    state: ButtonState,
    pending: Option<Request>,
    interactive: bool,
    tx: watch::Sender<ButtonSnapshot>,
}

impl<H: ViewHost> ButtonStateMachine<H> {
    /// Create a machine in Normal and apply its resting visuals.
    pub fn new(config: &ButtonConfig, host: H) -> Self {
        let (tx, _rx) = watch::channel(ButtonSnapshot {
            state: ButtonState::Normal,
            animating: false,
            pending: None,
        });

        let mut machine = Self {
            host,
            runner: TransitionRunner::new(config),
            state: ButtonState::Normal,
            pending: None,
            interactive: true,
            tx,
        };
        machine.apply_resting_visuals(ButtonState::Normal);
        machine.host.set_interactive(true);
        machine
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Ask for a move to `target`.
    pub fn request(&mut self, target: ButtonState) -> RequestOutcome {
        self.submit(Request::Show(target))
    }

    /// Ask for an immediate return to Normal.
    pub fn reset(&mut self) -> RequestOutcome {
        self.submit(Request::Reset)
    }

    /// Run a request now, or park it in the pending slot while busy.
    ///
    /// While busy the request is not validated: the committed state is about
    /// to change, so legality is checked when it is replayed.
    pub fn submit(&mut self, request: Request) -> RequestOutcome {
        if self.runner.is_in_flight() {
            return self.defer(request);
        }

        match request {
            Request::Show(target) => self.start(target),
            Request::Reset => self.apply_reset(),
        }
    }

    fn start(&mut self, target: ButtonState) -> RequestOutcome {
        let Some(transition) = Transition::between(self.state, target) else {
            let illegal = IllegalTransition {
                from: self.state,
                to: target,
            };
            tracing::debug!("Ignoring request: {}", illegal);
            return RequestOutcome::Ignored(illegal);
        };

        self.set_interactive(false);
        match self.runner.run(transition, &mut self.host) {
            Ok(RunOutcome::Started(_)) => {
                self.broadcast();
                RequestOutcome::Started(transition)
            }
            Ok(RunOutcome::Settled) => {
                self.settle(transition);
                RequestOutcome::Committed(transition)
            }
            Err(e) => {
                tracing::warn!("Runner refused {}: {}", transition, e);
                self.defer(Request::Show(target))
            }
        }
    }

    fn defer(&mut self, request: Request) -> RequestOutcome {
        let replaced = self.pending.replace(request);
        match replaced {
            Some(old) => tracing::debug!("Pending {:?} replaced by {:?}", old, request),
            None => tracing::debug!("Deferred {:?} until the current transition settles", request),
        }
        self.broadcast();
        RequestOutcome::Deferred { replaced }
    }

    fn apply_reset(&mut self) -> RequestOutcome {
        self.runner.restore_width(&mut self.host);
        self.apply_resting_visuals(ButtonState::Normal);
        self.state = ButtonState::Normal;
        self.set_interactive(true);
        tracing::debug!("Reset to normal");
        self.broadcast();
        RequestOutcome::Reset
    }

    // =========================================================================
    // Completion
    // =========================================================================

    /// Report a finished sub-animation. Called on behalf of the host.
    pub fn on_animation_end(&mut self, ticket: AnimationTicket) {
        if let Completion::Settled(transition) = self.runner.complete(ticket) {
            self.settle(transition);
        }
    }

    /// Commit, re-enable interaction, then replay whatever is pending.
    ///
    /// The pending slot is emptied before anything is published, so no
    /// snapshot ever shows an idle machine holding a pending request.
    fn settle(&mut self, transition: Transition) {
        self.state = transition.to();
        self.set_interactive(self.state == ButtonState::Normal);
        tracing::debug!("Committed {}", self.state);

        let Some(next) = self.pending.take() else {
            self.broadcast();
            return;
        };

        tracing::debug!("Replaying pending {:?}", next);
        if let RequestOutcome::Ignored(_) = self.submit(next) {
            // Nothing was started, publish the commit itself.
            self.broadcast();
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The last committed state. Unchanged while a choreography is in flight.
    pub fn current_state(&self) -> ButtonState {
        self.state
    }

    /// Whether a choreography is in flight.
    pub fn is_animating(&self) -> bool {
        self.runner.is_in_flight()
    }

    pub fn pending(&self) -> Option<Request> {
        self.pending
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn snapshot(&self) -> ButtonSnapshot {
        ButtonSnapshot {
            state: self.state,
            animating: self.runner.is_in_flight(),
            pending: self.pending,
        }
    }

    /// Subscribe to snapshots. Clone the receiver for each subscriber.
    pub fn subscribe(&self) -> watch::Receiver<ButtonSnapshot> {
        self.tx.subscribe()
    }

    pub fn runner(&self) -> &TransitionRunner {
        &self.runner
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn apply_resting_visuals(&mut self, state: ButtonState) {
        for view in View::CONTENT {
            let opacity = if view == state.visual() {
                Opacity::SHOWN
            } else {
                Opacity::HIDDEN
            };
            self.host.set_opacity(view, opacity);
        }
    }

    fn set_interactive(&mut self, interactive: bool) {
        if self.interactive != interactive {
            self.interactive = interactive;
            self.host.set_interactive(interactive);
        }
    }

    fn broadcast(&self) {
        self.tx.send_replace(self.snapshot());
    }
}

//! Transition runner.
//!
//! Drives one transition's choreography: an optional body resize issued
//! together with a cross-fade between two child visuals. The session settles
//! once every sub-animation has reported back, whichever finishes last.

use animbutton_core::{
    Animation, ButtonConfig, Opacity, Resize, RunnerError, Transition, View,
};
use std::time::Duration;

use crate::host::{AnimationTicket, Parts, SessionId, ViewHost};

/// Sub-animations still outstanding for the transition in flight.
#[derive(Debug, Clone)]
pub struct AnimationSession {
    pub id: SessionId,
    pub transition: Transition,
    pub outstanding: Parts,
}

/// Result of starting a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Sub-animations were issued; wait for their tickets.
    Started(SessionId),
    /// Nothing to animate, the transition is already settled.
    Settled,
}

/// Result of reporting a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Other sub-animations of the session are still running.
    Outstanding,
    /// The last sub-animation finished.
    Settled(Transition),
    /// The ticket does not belong to the session in flight.
    Stale,
}

/// Executes choreographies and tracks the in-flight session.
#[derive(Debug)]
pub struct TransitionRunner {
    resize_duration: Duration,
    fade_duration: Duration,
    next_session: u64,
    session: Option<AnimationSession>,
    /// Body width captured at the last shrink, restored by the next expand.
    width_before_shrink: Option<u32>,
}

impl TransitionRunner {
    pub fn new(config: &ButtonConfig) -> Self {
        Self {
            resize_duration: config.transition_duration(),
            fade_duration: config.fade_duration(),
            next_session: 0,
            session: None,
            width_before_shrink: None,
        }
    }

    /// True between `run` and the settling of its session.
    pub fn is_in_flight(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&AnimationSession> {
        self.session.as_ref()
    }

    pub fn width_before_shrink(&self) -> Option<u32> {
        self.width_before_shrink
    }

    /// Issue every sub-animation of `transition` to the host.
    pub fn run<H>(&mut self, transition: Transition, host: &mut H) -> Result<RunOutcome, RunnerError>
    where
        H: ViewHost + ?Sized,
    {
        if let Some(session) = &self.session {
            return Err(RunnerError::InFlight {
                session: session.id.0,
            });
        }

        let choreography = transition.choreography();
        let mut animations: Vec<(Parts, Animation)> = Vec::with_capacity(3);

        if let Some(resize) = choreography.resize {
            let size = host.measure(View::Body);
            let target = match resize {
                Resize::Shrink => {
                    // Collapsed body is as wide as it is tall.
                    self.width_before_shrink = Some(size.width);
                    size.height
                }
                Resize::Expand => self.width_before_shrink.unwrap_or_else(|| {
                    tracing::debug!("Expand without a prior shrink, keeping width {}", size.width);
                    size.width
                }),
            };
            animations.push((
                Parts::RESIZE,
                Animation::width(View::Body, size.width, target, self.resize_duration),
            ));
        }

        if choreography.fade_out != choreography.fade_in {
            animations.push((
                Parts::FADE_OUT,
                Animation::opacity(choreography.fade_out, Opacity::HIDDEN, self.fade_duration),
            ));
            animations.push((
                Parts::FADE_IN,
                Animation::opacity(choreography.fade_in, Opacity::SHOWN, self.fade_duration),
            ));
        }

        if animations.is_empty() {
            tracing::debug!("Transition {} has nothing to animate", transition);
            return Ok(RunOutcome::Settled);
        }

        let id = SessionId(self.next_session);
        self.next_session += 1;

        let outstanding = animations
            .iter()
            .fold(Parts::empty(), |acc, (part, _)| acc | *part);
        self.session = Some(AnimationSession {
            id,
            transition,
            outstanding,
        });

        tracing::debug!(
            "Session {} started for {} ({} sub-animations)",
            id,
            transition,
            animations.len()
        );

        for (part, animation) in animations {
            host.animate(AnimationTicket { session: id, part }, animation);
        }

        Ok(RunOutcome::Started(id))
    }

    /// Record the completion of one sub-animation.
    pub fn complete(&mut self, ticket: AnimationTicket) -> Completion {
        let Some(session) = self.session.as_mut() else {
            tracing::warn!("Ignoring ticket {}: no session in flight", ticket);
            return Completion::Stale;
        };

        if ticket.session != session.id
            || ticket.part.is_empty()
            || !session.outstanding.contains(ticket.part)
        {
            tracing::warn!(
                "Ignoring ticket {}: session {} waits on {:?}",
                ticket,
                session.id,
                session.outstanding
            );
            return Completion::Stale;
        }

        session.outstanding.remove(ticket.part);
        if !session.outstanding.is_empty() {
            return Completion::Outstanding;
        }

        match self.session.take() {
            Some(session) => {
                tracing::debug!("Session {} settled ({})", session.id, session.transition);
                Completion::Settled(session.transition)
            }
            None => Completion::Stale,
        }
    }

    /// Put the body back to its pre-shrink width without animating.
    pub fn restore_width<H>(&mut self, host: &mut H)
    where
        H: ViewHost + ?Sized,
    {
        if let Some(width) = self.width_before_shrink {
            host.set_width(View::Body, width);
        }
    }
}

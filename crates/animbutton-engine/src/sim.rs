//! Deterministic host for tests and headless runs.
//!
//! Animations do not interpolate: a running animation applies its final value
//! when its remaining time reaches zero, and its ticket is returned by
//! [`SimulatedHost::advance`] in end-time order.
//!
//! The clock helpers on the machine step from one end time to the next, so a
//! replay started by a settle gets the rest of the interval.

use animbutton_core::{AnimatedProperty, Animation, Opacity, Size, View};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::host::{AnimationTicket, ViewHost};
use crate::machine::ButtonStateMachine;
use crate::widget::AnimatedButton;

#[derive(Debug, Clone, Copy, Default)]
struct ViewProps {
    size: Size,
    opacity: Opacity,
}

#[derive(Debug, Clone, Copy)]
struct Running {
    ticket: AnimationTicket,
    animation: Animation,
    remaining: Duration,
}

/// Something the host was asked to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Opacity(View, Opacity),
    Width(View, u32),
    Interactive(bool),
    Started(AnimationTicket, Animation),
    Finished(AnimationTicket),
}

impl fmt::Display for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostEvent::Opacity(view, opacity) => write!(f, "set {} opacity {}", view, opacity),
            HostEvent::Width(view, width) => write!(f, "set {} width {}", view, width),
            HostEvent::Interactive(on) => write!(f, "interactive {}", on),
            HostEvent::Started(ticket, animation) => write!(f, "start {} {}", ticket, animation),
            HostEvent::Finished(ticket) => write!(f, "end {}", ticket),
        }
    }
}

/// Host with a manual clock.
#[derive(Debug, Default)]
pub struct SimulatedHost {
    views: HashMap<View, ViewProps>,
    interactive: bool,
    running: Vec<Running>,
    events: Vec<HostEvent>,
}

impl SimulatedHost {
    /// Create a host whose body has the given measured size.
    pub fn new(body: Size) -> Self {
        let mut views = HashMap::new();
        views.insert(
            View::Body,
            ViewProps {
                size: body,
                opacity: Opacity::SHOWN,
            },
        );
        Self {
            views,
            ..Default::default()
        }
    }

    pub fn opacity(&self, view: View) -> Opacity {
        self.views.get(&view).map(|p| p.opacity).unwrap_or_default()
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Number of animations still running.
    pub fn running(&self) -> usize {
        self.running.len()
    }

    /// Tickets of the animations still running, in start order.
    pub fn running_tickets(&self) -> impl Iterator<Item = AnimationTicket> + '_ {
        self.running.iter().map(|r| r.ticket)
    }

    /// Time until the next running animation ends.
    pub fn next_end(&self) -> Option<Duration> {
        self.running.iter().map(|r| r.remaining).min()
    }

    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Recorded events, one per line.
    pub fn event_log(&self) -> String {
        self.events
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Move the clock forward. Returns the tickets that finished, earliest first.
    pub fn advance(&mut self, dt: Duration) -> Vec<AnimationTicket> {
        let (mut finished, running): (Vec<Running>, Vec<Running>) = self
            .running
            .drain(..)
            .partition(|r| r.remaining <= dt);
        self.running = running
            .into_iter()
            .map(|mut r| {
                r.remaining -= dt;
                r
            })
            .collect();

        finished.sort_by_key(|r| r.remaining);
        finished
            .into_iter()
            .map(|r| {
                self.apply(r.animation);
                self.events.push(HostEvent::Finished(r.ticket));
                r.ticket
            })
            .collect()
    }

    /// Finish every running animation.
    pub fn finish_all(&mut self) -> Vec<AnimationTicket> {
        let longest = self
            .running
            .iter()
            .map(|r| r.remaining)
            .max()
            .unwrap_or_default();
        self.advance(longest)
    }

    fn apply(&mut self, animation: Animation) {
        let props = self.views.entry(animation.view).or_default();
        match animation.property {
            AnimatedProperty::Width { to, .. } => props.size.width = to,
            AnimatedProperty::Opacity { to } => props.opacity = to,
        }
    }
}

impl ViewHost for SimulatedHost {
    fn measure(&self, view: View) -> Size {
        self.views.get(&view).map(|p| p.size).unwrap_or_default()
    }

    fn set_opacity(&mut self, view: View, opacity: Opacity) {
        self.views.entry(view).or_default().opacity = opacity;
        self.events.push(HostEvent::Opacity(view, opacity));
    }

    fn set_width(&mut self, view: View, width: u32) {
        self.views.entry(view).or_default().size.width = width;
        self.events.push(HostEvent::Width(view, width));
    }

    fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
        self.events.push(HostEvent::Interactive(interactive));
    }

    fn animate(&mut self, ticket: AnimationTicket, animation: Animation) {
        self.events.push(HostEvent::Started(ticket, animation));
        self.running.push(Running {
            ticket,
            animation,
            remaining: animation.duration,
        });
    }
}

// =============================================================================
// Clock helpers
// =============================================================================

impl ButtonStateMachine<SimulatedHost> {
    /// Advance the simulated clock and deliver finished tickets.
    ///
    /// Time is spent one end time at a time. Animations started by a settle
    /// inside `dt` run for whatever is left of it.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let mut left = dt;
        let mut count = 0;

        loop {
            let step = match self.host().next_end() {
                Some(next) if next <= left => next,
                _ => {
                    self.host_mut().advance(left);
                    return count;
                }
            };
            left -= step;

            let finished = self.host_mut().advance(step);
            count += finished.len();
            for ticket in finished {
                self.on_animation_end(ticket);
            }
        }
    }

    /// Deliver completions until nothing is running, including replays.
    pub fn run_until_idle(&mut self) {
        loop {
            let finished = self.host_mut().finish_all();
            if finished.is_empty() {
                break;
            }
            for ticket in finished {
                self.on_animation_end(ticket);
            }
        }
    }
}

impl AnimatedButton<SimulatedHost> {
    pub fn advance(&mut self, dt: Duration) -> usize {
        self.machine_mut().advance(dt)
    }

    pub fn run_until_idle(&mut self) {
        self.machine_mut().run_until_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Parts, SessionId};

    fn ticket(part: Parts) -> AnimationTicket {
        AnimationTicket {
            session: SessionId(0),
            part,
        }
    }

    #[test]
    fn test_advance_finishes_in_end_order() {
        let mut host = SimulatedHost::new(Size::new(100, 20));
        host.animate(
            ticket(Parts::RESIZE),
            Animation::width(View::Body, 100, 20, Duration::from_millis(300)),
        );
        host.animate(
            ticket(Parts::FADE_IN),
            Animation::opacity(View::Spinner, Opacity::SHOWN, Duration::from_millis(100)),
        );

        assert!(host.advance(Duration::from_millis(50)).is_empty());
        assert_eq!(host.advance(Duration::from_millis(50)), vec![ticket(Parts::FADE_IN)]);
        assert!(host.opacity(View::Spinner).is_shown());
        assert_eq!(host.measure(View::Body).width, 100);

        assert_eq!(host.finish_all(), vec![ticket(Parts::RESIZE)]);
        assert_eq!(host.measure(View::Body).width, 20);
        assert_eq!(host.running(), 0);
    }

    #[test]
    fn test_zero_duration_finishes_on_next_tick() {
        let mut host = SimulatedHost::new(Size::new(100, 20));
        host.animate(
            ticket(Parts::FADE_OUT),
            Animation::opacity(View::Label, Opacity::HIDDEN, Duration::ZERO),
        );
        assert_eq!(host.advance(Duration::ZERO), vec![ticket(Parts::FADE_OUT)]);
        assert_eq!(host.events().last(), Some(&HostEvent::Finished(ticket(Parts::FADE_OUT))));
    }

    #[test]
    fn test_next_end_is_earliest_remaining() {
        let mut host = SimulatedHost::new(Size::new(100, 20));
        assert_eq!(host.next_end(), None);

        host.animate(
            ticket(Parts::RESIZE),
            Animation::width(View::Body, 100, 20, Duration::from_millis(300)),
        );
        host.animate(
            ticket(Parts::FADE_OUT),
            Animation::opacity(View::Label, Opacity::HIDDEN, Duration::from_millis(120)),
        );
        host.advance(Duration::from_millis(20));

        assert_eq!(host.next_end(), Some(Duration::from_millis(100)));
        assert_eq!(
            host.running_tickets().collect::<Vec<_>>(),
            vec![ticket(Parts::RESIZE), ticket(Parts::FADE_OUT)]
        );
    }

    #[test]
    fn test_event_log() {
        let mut host = SimulatedHost::new(Size::new(100, 20));
        host.set_interactive(false);
        host.set_width(View::Body, 80);
        host.animate(
            ticket(Parts::FADE_IN),
            Animation::opacity(View::Label, Opacity::SHOWN, Duration::from_millis(10)),
        );
        host.finish_all();

        insta::assert_snapshot!(host.event_log(), @r"
        interactive false
        set body width 80
        start #0/fade_in label opacity ->1.00 over 10ms
        end #0/fade_in
        ");
    }
}

//! The animated button as the embedding application sees it.

use animbutton_core::{ButtonConfig, ButtonState, Transition};
use tokio::sync::watch;

use crate::host::{AnimationTicket, ViewHost};
use crate::machine::{ButtonSnapshot, ButtonStateMachine, RequestOutcome};

/// Passed to the click listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    /// Committed state at the time of the click.
    pub state: ButtonState,
    /// Auto-transition fired by this click, if any.
    pub auto_transition: Option<Transition>,
}

/// Application callback invoked after the default click behaviour.
pub type ClickListener = Box<dyn FnMut(&ClickEvent) + Send>;

/// Button with NORMAL, LOADING, SUCCESS and FAILURE states.
pub struct AnimatedButton<H> {
    machine: ButtonStateMachine<H>,
    config: ButtonConfig,
    listener: Option<ClickListener>,
}

impl<H: ViewHost> AnimatedButton<H> {
    pub fn new(config: ButtonConfig, host: H) -> Self {
        let machine = ButtonStateMachine::new(&config, host);
        Self {
            machine,
            config,
            listener: None,
        }
    }

    pub fn show_loading(&mut self) -> RequestOutcome {
        self.machine.request(ButtonState::Loading)
    }

    pub fn show_success(&mut self) -> RequestOutcome {
        self.machine.request(ButtonState::Success)
    }

    pub fn show_failure(&mut self) -> RequestOutcome {
        self.machine.request(ButtonState::Failure)
    }

    pub fn show_normal(&mut self) -> RequestOutcome {
        self.machine.request(ButtonState::Normal)
    }

    /// Move to `target`. Illegal moves are ignored.
    pub fn show(&mut self, target: ButtonState) -> RequestOutcome {
        self.machine.request(target)
    }

    /// Return to Normal at once, without animating.
    pub fn reset(&mut self) -> RequestOutcome {
        self.machine.reset()
    }

    pub fn is_animating(&self) -> bool {
        self.machine.is_animating()
    }

    pub fn current_state(&self) -> ButtonState {
        self.machine.current_state()
    }

    pub fn snapshot(&self) -> ButtonSnapshot {
        self.machine.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ButtonSnapshot> {
        self.machine.subscribe()
    }

    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }

    /// Set the listener invoked on every accepted click.
    pub fn set_click_listener(&mut self, listener: ClickListener) {
        self.listener = Some(listener);
    }

    pub fn clear_click_listener(&mut self) {
        self.listener = None;
    }

    /// Handle an activation of the interaction surface.
    ///
    /// Returns `false` when interaction is disabled and the click was dropped.
    /// Otherwise the state's auto-transition (when enabled) is requested before
    /// the listener runs.
    pub fn click(&mut self) -> bool {
        if !self.machine.is_interactive() {
            tracing::debug!("Click ignored: interaction disabled");
            return false;
        }

        let state = self.machine.current_state();
        let auto_transition = if self.config.auto_transition {
            state.auto_transition()
        } else {
            None
        };

        if let Some(transition) = auto_transition {
            tracing::debug!("Click fires {}", transition);
            let _ = self.machine.request(transition.to());
        }

        if let Some(listener) = self.listener.as_mut() {
            listener(&ClickEvent {
                state,
                auto_transition,
            });
        }
        true
    }

    /// Report a finished host animation.
    pub fn on_animation_end(&mut self, ticket: AnimationTicket) {
        self.machine.on_animation_end(ticket);
    }

    pub fn machine(&self) -> &ButtonStateMachine<H> {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut ButtonStateMachine<H> {
        &mut self.machine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedHost;
    use animbutton_core::{Size, View};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    fn button(config: ButtonConfig) -> AnimatedButton<SimulatedHost> {
        AnimatedButton::new(config, SimulatedHost::new(Size::new(240, 56)))
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut button = button(ButtonConfig::default());
        let original = button.machine().host().measure(View::Body).width;

        button.show_loading();
        assert_eq!(button.current_state(), ButtonState::Normal);
        assert!(button.is_animating());
        button.run_until_idle();
        assert_eq!(button.current_state(), ButtonState::Loading);
        assert!(!button.is_animating());

        button.show_success();
        button.run_until_idle();
        assert_eq!(button.current_state(), ButtonState::Success);

        button.show(ButtonState::Normal);
        button.run_until_idle();
        assert_eq!(button.current_state(), ButtonState::Normal);
        assert_eq!(button.machine().host().measure(View::Body).width, original);
    }

    #[test]
    fn test_keeps_config() {
        let config = ButtonConfig::default().with_auto_transition(false);
        let button = button(config.clone());
        assert_eq!(button.config(), &config);
    }

    #[test]
    fn test_cleared_listener_is_not_called() {
        let mut button = button(ButtonConfig::default().with_auto_transition(false));
        let clicks = Arc::new(Mutex::new(0));
        let sink = clicks.clone();
        button.set_click_listener(Box::new(move |_: &ClickEvent| *sink.lock() += 1));

        assert!(button.click());
        button.clear_click_listener();
        assert!(button.click());
        assert_eq!(*clicks.lock(), 1);
    }

    #[test]
    fn test_choreography_log() {
        let config = ButtonConfig::default()
            .with_durations(Duration::from_millis(300), Duration::from_millis(150));
        let mut button = button(config);
        button.machine_mut().host_mut().clear_events();

        button.show_loading();
        button.run_until_idle();
        button.show_failure();
        button.run_until_idle();

        insta::assert_snapshot!(button.machine().host().event_log(), @r"
        interactive false
        start #0/resize body width 240->56 over 300ms
        start #0/fade_out label opacity ->0.00 over 150ms
        start #0/fade_in spinner opacity ->1.00 over 150ms
        end #0/fade_out
        end #0/fade_in
        end #0/resize
        start #1/fade_out spinner opacity ->0.00 over 150ms
        start #1/fade_in failure_glyph opacity ->1.00 over 150ms
        end #1/fade_out
        end #1/fade_in
        ");
    }

    #[test]
    fn test_show_is_idempotent_when_illegal() {
        let mut button = button(ButtonConfig::default());
        assert!(matches!(button.show_success(), RequestOutcome::Ignored(_)));
        assert!(matches!(button.show_normal(), RequestOutcome::Ignored(_)));
        assert!(!button.is_animating());
        assert_eq!(button.current_state(), ButtonState::Normal);
    }

    #[test]
    fn test_click_auto_loads_then_forwards() {
        let mut button = button(ButtonConfig::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        button.set_click_listener(Box::new(move |event: &ClickEvent| {
            sink.lock().push(*event)
        }));

        assert!(button.click());
        assert!(button.is_animating());
        assert_eq!(
            seen.lock().as_slice(),
            &[ClickEvent {
                state: ButtonState::Normal,
                auto_transition: Some(Transition::NormalToLoading),
            }]
        );

        // Disabled while busy and while loading.
        assert!(!button.click());
        button.run_until_idle();
        assert!(!button.click());
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_click_without_auto_transition_only_forwards() {
        let mut button = button(ButtonConfig::default().with_auto_transition(false));
        let clicks = Arc::new(Mutex::new(0));
        let sink = clicks.clone();
        button.set_click_listener(Box::new(move |event: &ClickEvent| {
            assert_eq!(event.auto_transition, None);
            *sink.lock() += 1;
        }));

        assert!(button.click());
        assert!(button.click());
        assert!(!button.is_animating());
        assert_eq!(*clicks.lock(), 2);
    }

    #[test]
    fn test_click_after_return_to_normal() {
        let mut button = button(ButtonConfig::default());
        button.click();
        button.run_until_idle();
        button.show_normal();
        button.run_until_idle();

        assert!(button.click());
        assert!(button.is_animating());
        assert_eq!(button.snapshot().state, ButtonState::Normal);
    }
}

//! Per-widget button runtime with thread-safe async access.
//!
//! A button must be driven from one serialized context, so each widget lives
//! on a dedicated OS thread and everything else talks to it via channels.
//! Host animation callbacks are marshalled back onto that thread through a
//! [`CompletionSender`], which keeps "one transition in flight" intact even
//! when the host's animation clock fires on other threads.

mod control;

pub use control::ButtonControl;

use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use animbutton_core::{ButtonConfig, ButtonError, ButtonState};
use animbutton_engine::{
    AnimatedButton, AnimationTicket, ButtonSnapshot, ClickListener, Request, RequestOutcome,
    ViewHost,
};
use tokio::sync::{oneshot, watch};
use uuid::Uuid;

/// Messages for the runtime thread.
enum Command {
    Request {
        request: Request,
        resp: oneshot::Sender<RequestOutcome>,
    },
    Click {
        resp: oneshot::Sender<bool>,
    },
    AnimationEnded(AnimationTicket),
    SetClickListener(Option<ClickListener>),
    Snapshot {
        resp: oneshot::Sender<ButtonSnapshot>,
    },
    Shutdown,
}

/// Reports host animation completions back to the runtime thread.
#[derive(Clone)]
pub struct CompletionSender {
    tx: mpsc::Sender<Command>,
}

impl CompletionSender {
    /// Report that the animation behind `ticket` finished.
    pub fn animation_ended(&self, ticket: AnimationTicket) -> Result<(), ButtonError> {
        self.tx
            .send(Command::AnimationEnded(ticket))
            .map_err(|_| ButtonError::RuntimeUnavailable)
    }
}

// =============================================================================
// ButtonRuntime
// =============================================================================

/// Owns the runtime thread of one button.
///
/// Dropping it shuts the thread down; outstanding handles then fail with
/// `ButtonError::RuntimeUnavailable`.
pub struct ButtonRuntime {
    handle: ButtonHandle,
    _thread: JoinHandle<()>,
}

impl ButtonRuntime {
    /// Start a runtime thread for a new button.
    ///
    /// `make_host` runs on the runtime thread, so the host itself never has
    /// to be `Send`. It receives the sender its animation callbacks report to.
    pub fn spawn<H, F>(config: ButtonConfig, make_host: F) -> Result<Self, ButtonError>
    where
        H: ViewHost + 'static,
        F: FnOnce(CompletionSender) -> H + Send + 'static,
    {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let completions = CompletionSender { tx: tx.clone() };

        let thread = thread::Builder::new()
            .name(format!("animbutton-{}", id.simple()))
            .spawn(move || {
                let span = tracing::debug_span!("button", %id);
                let _enter = span.enter();

                let host = make_host(completions);
                let mut button = AnimatedButton::new(config, host);
                if ready_tx.send(button.subscribe()).is_err() {
                    return;
                }
                tracing::info!("Button runtime thread started");

                while let Ok(command) = rx.recv() {
                    match command {
                        Command::Request { request, resp } => {
                            let outcome = button.machine_mut().submit(request);
                            let _ = resp.send(outcome);
                        }
                        Command::Click { resp } => {
                            let accepted = button.click();
                            let _ = resp.send(accepted);
                        }
                        Command::AnimationEnded(ticket) => {
                            button.on_animation_end(ticket);
                        }
                        Command::SetClickListener(Some(listener)) => {
                            button.set_click_listener(listener);
                        }
                        Command::SetClickListener(None) => {
                            button.clear_click_listener();
                        }
                        Command::Snapshot { resp } => {
                            let _ = resp.send(button.snapshot());
                        }
                        Command::Shutdown => {
                            tracing::info!("Button runtime thread shutting down");
                            break;
                        }
                    }
                }
            })
            .map_err(|e| ButtonError::Spawn(e.to_string()))?;

        let state = ready_rx
            .recv()
            .map_err(|_| ButtonError::RuntimeUnavailable)?;

        Ok(Self {
            handle: ButtonHandle { id, tx, state },
            _thread: thread,
        })
    }

    /// Get a handle to the button.
    pub fn handle(&self) -> ButtonHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime thread.
    pub fn shutdown(&self) {
        self.handle.shutdown();
    }
}

impl Drop for ButtonRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// =============================================================================
// ButtonHandle
// =============================================================================

/// Cloneable access to a button running on its own thread.
#[derive(Clone)]
pub struct ButtonHandle {
    id: Uuid,
    tx: mpsc::Sender<Command>,
    state: watch::Receiver<ButtonSnapshot>,
}

impl ButtonHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Submit a request and wait for its outcome.
    pub async fn request(&self, request: Request) -> Result<RequestOutcome, ButtonError> {
        self.call(|resp| Command::Request { request, resp }).await
    }

    pub async fn show(&self, target: ButtonState) -> Result<RequestOutcome, ButtonError> {
        self.request(Request::Show(target)).await
    }

    pub async fn show_loading(&self) -> Result<RequestOutcome, ButtonError> {
        self.show(ButtonState::Loading).await
    }

    pub async fn show_success(&self) -> Result<RequestOutcome, ButtonError> {
        self.show(ButtonState::Success).await
    }

    pub async fn show_failure(&self) -> Result<RequestOutcome, ButtonError> {
        self.show(ButtonState::Failure).await
    }

    pub async fn show_normal(&self) -> Result<RequestOutcome, ButtonError> {
        self.show(ButtonState::Normal).await
    }

    pub async fn reset(&self) -> Result<RequestOutcome, ButtonError> {
        self.request(Request::Reset).await
    }

    /// Deliver a click. Returns whether the button accepted it.
    pub async fn click(&self) -> Result<bool, ButtonError> {
        self.call(|resp| Command::Click { resp }).await
    }

    /// Current snapshot, ordered after every command sent before it.
    pub async fn snapshot(&self) -> Result<ButtonSnapshot, ButtonError> {
        self.call(|resp| Command::Snapshot { resp }).await
    }

    /// Snapshot with timeout wrapper.
    ///
    /// This bounds the wait for the runtime thread only; an animation that
    /// never completes is not detected.
    pub async fn snapshot_timeout(&self, timeout: Duration) -> Result<ButtonSnapshot, ButtonError> {
        match tokio::time::timeout(timeout, self.snapshot()).await {
            Ok(result) => result,
            Err(_) => Err(ButtonError::Timeout { duration: timeout }),
        }
    }

    /// Latest broadcast snapshot, without a round trip.
    pub fn latest(&self) -> ButtonSnapshot {
        *self.state.borrow()
    }

    /// Latest broadcast `current_state`.
    pub fn current_state(&self) -> ButtonState {
        self.latest().state
    }

    /// Latest broadcast `is_animating`.
    pub fn is_animating(&self) -> bool {
        self.latest().animating
    }

    /// Subscribe to state changes. Clone the receiver for each subscriber.
    pub fn subscribe(&self) -> watch::Receiver<ButtonSnapshot> {
        self.state.clone()
    }

    /// Sender for host animation completions.
    pub fn completions(&self) -> CompletionSender {
        CompletionSender {
            tx: self.tx.clone(),
        }
    }

    /// Set the listener invoked on accepted clicks. Runs on the runtime thread.
    pub fn set_click_listener(&self, listener: ClickListener) -> Result<(), ButtonError> {
        self.send(Command::SetClickListener(Some(listener)))
    }

    pub fn clear_click_listener(&self) -> Result<(), ButtonError> {
        self.send(Command::SetClickListener(None))
    }

    /// Ask the runtime thread to stop.
    pub fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown);
    }

    fn send(&self, command: Command) -> Result<(), ButtonError> {
        self.tx
            .send(command)
            .map_err(|_| ButtonError::RuntimeUnavailable)
    }

    async fn call<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, ButtonError> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.send(command(resp_tx))?;
        resp_rx
            .await
            .map_err(|e| ButtonError::Channel(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animbutton_core::{Animation, Opacity, Size, Transition, View};
    use animbutton_engine::ClickEvent;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Host that records tickets so the test decides when animations end.
    struct RecordingHost {
        tickets: Arc<Mutex<Vec<AnimationTicket>>>,
    }

    impl ViewHost for RecordingHost {
        fn measure(&self, _view: View) -> Size {
            Size::new(200, 50)
        }

        fn set_opacity(&mut self, _view: View, _opacity: Opacity) {}

        fn set_width(&mut self, _view: View, _width: u32) {}

        fn set_interactive(&mut self, _interactive: bool) {}

        fn animate(&mut self, ticket: AnimationTicket, _animation: Animation) {
            self.tickets.lock().push(ticket);
        }
    }

    fn spawn() -> (ButtonRuntime, Arc<Mutex<Vec<AnimationTicket>>>) {
        let tickets = Arc::new(Mutex::new(Vec::new()));
        let recorded = tickets.clone();
        let runtime = ButtonRuntime::spawn(ButtonConfig::default(), move |_completions| {
            RecordingHost { tickets: recorded }
        })
        .unwrap();
        (runtime, tickets)
    }

    fn finish_all(handle: &ButtonHandle, tickets: &Mutex<Vec<AnimationTicket>>) {
        let completions = handle.completions();
        for ticket in tickets.lock().drain(..) {
            completions.animation_ended(ticket).unwrap();
        }
    }

    #[tokio::test]
    async fn test_commit_on_completion() {
        let (runtime, tickets) = spawn();
        let handle = runtime.handle();

        let outcome = handle.show_loading().await.unwrap();
        assert_eq!(outcome, RequestOutcome::Started(Transition::NormalToLoading));

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.state, ButtonState::Normal);
        assert!(snapshot.animating);
        assert_eq!(tickets.lock().len(), 3);

        finish_all(&handle, &tickets);
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.state, ButtonState::Loading);
        assert!(!snapshot.animating);
        assert_eq!(handle.current_state(), ButtonState::Loading);
    }

    #[tokio::test]
    async fn test_pending_collapse_through_actor() {
        let (runtime, tickets) = spawn();
        let handle = runtime.handle();

        handle.show_loading().await.unwrap();
        handle.show_success().await.unwrap();
        let outcome = handle.show_failure().await.unwrap();
        assert_eq!(
            outcome,
            RequestOutcome::Deferred {
                replaced: Some(Request::Show(ButtonState::Success))
            }
        );

        finish_all(&handle, &tickets);
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.state, ButtonState::Loading);
        assert!(snapshot.animating);
        assert_eq!(snapshot.pending, None);

        finish_all(&handle, &tickets);
        assert_eq!(handle.snapshot().await.unwrap().state, ButtonState::Failure);
    }

    #[tokio::test]
    async fn test_click_runs_listener_on_runtime_thread() {
        let (runtime, _tickets) = spawn();
        let handle = runtime.handle();

        let clicks = Arc::new(Mutex::new(Vec::new()));
        let sink = clicks.clone();
        handle
            .set_click_listener(Box::new(move |event: &ClickEvent| {
                sink.lock().push(event.state)
            }))
            .unwrap();

        assert!(handle.click().await.unwrap());
        assert!(!handle.click().await.unwrap());
        assert_eq!(clicks.lock().as_slice(), &[ButtonState::Normal]);
        assert!(handle.is_animating());
    }

    #[tokio::test]
    async fn test_cleared_listener_is_not_called() {
        let (runtime, _tickets) = spawn();
        let handle = runtime.handle();

        let clicks = Arc::new(Mutex::new(0));
        let sink = clicks.clone();
        handle
            .set_click_listener(Box::new(move |_: &ClickEvent| *sink.lock() += 1))
            .unwrap();
        handle.clear_click_listener().unwrap();

        assert!(handle.click().await.unwrap());
        assert_eq!(*clicks.lock(), 0);
    }

    #[tokio::test]
    async fn test_reset_from_failure() {
        let (runtime, tickets) = spawn();
        let handle = runtime.handle();

        handle.show_loading().await.unwrap();
        finish_all(&handle, &tickets);
        handle.show_failure().await.unwrap();
        finish_all(&handle, &tickets);

        assert_eq!(handle.reset().await.unwrap(), RequestOutcome::Reset);
        assert_eq!(handle.snapshot().await.unwrap().state, ButtonState::Normal);
    }

    #[tokio::test]
    async fn test_snapshot_timeout() {
        let (runtime, _tickets) = spawn();
        let handle = runtime.handle();

        let started = Arc::new(tokio::sync::Notify::new());
        let signal = started.clone();
        handle
            .set_click_listener(Box::new(move |_: &ClickEvent| {
                signal.notify_one();
                std::thread::sleep(Duration::from_millis(300))
            }))
            .unwrap();

        let clicker = handle.clone();
        let click = tokio::spawn(async move { clicker.click().await });
        started.notified().await;

        let result = handle.snapshot_timeout(Duration::from_millis(20)).await;
        assert!(matches!(result, Err(ButtonError::Timeout { .. })));
        assert!(click.await.unwrap().unwrap());
    }

    #[tokio::test]
    async fn test_requests_fail_after_shutdown() {
        let (runtime, _tickets) = spawn();
        let handle = runtime.handle();
        drop(runtime);

        // Shutdown is queued first, so either the send or the reply fails.
        assert!(handle.show_loading().await.is_err());
    }
}

//! Async control surface for application code.
//!
//! The `ButtonControl` trait returns futures, allowing the caller to spawn
//! them however they want. Application flows written against it can be
//! tested without a runtime thread.

use animbutton_core::{ButtonError, ButtonState};
use animbutton_engine::{ButtonSnapshot, Request, RequestOutcome};
use futures::future::BoxFuture;
use tokio::sync::watch;

use crate::ButtonHandle;

/// Operations the embedding application performs on a button.
pub trait ButtonControl: Send + Sync {
    /// Subscribe to state changes.
    fn subscribe(&self) -> watch::Receiver<ButtonSnapshot>;

    /// Request a move to `target`. Illegal moves come back as `Ignored`.
    fn show(&self, target: ButtonState) -> BoxFuture<'static, Result<RequestOutcome, ButtonError>>;

    /// Return to Normal without animating.
    fn reset(&self) -> BoxFuture<'static, Result<RequestOutcome, ButtonError>>;

    /// Deliver a click.
    fn click(&self) -> BoxFuture<'static, Result<bool, ButtonError>>;

    /// Snapshot ordered after all previously issued operations.
    fn snapshot(&self) -> BoxFuture<'static, Result<ButtonSnapshot, ButtonError>>;
}

impl ButtonControl for ButtonHandle {
    fn subscribe(&self) -> watch::Receiver<ButtonSnapshot> {
        ButtonHandle::subscribe(self)
    }

    fn show(&self, target: ButtonState) -> BoxFuture<'static, Result<RequestOutcome, ButtonError>> {
        let handle = self.clone();
        Box::pin(async move { handle.request(Request::Show(target)).await })
    }

    fn reset(&self) -> BoxFuture<'static, Result<RequestOutcome, ButtonError>> {
        let handle = self.clone();
        Box::pin(async move { handle.request(Request::Reset).await })
    }

    fn click(&self) -> BoxFuture<'static, Result<bool, ButtonError>> {
        let handle = self.clone();
        Box::pin(async move { ButtonHandle::click(&handle).await })
    }

    fn snapshot(&self) -> BoxFuture<'static, Result<ButtonSnapshot, ButtonError>> {
        let handle = self.clone();
        Box::pin(async move { ButtonHandle::snapshot(&handle).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ButtonRuntime;
    use animbutton_core::{ButtonConfig, Size};
    use animbutton_engine::SimulatedHost;

    async fn drive(control: &dyn ButtonControl) -> Result<RequestOutcome, ButtonError> {
        control.show(ButtonState::Success).await
    }

    #[tokio::test]
    async fn test_handle_as_control() {
        let runtime = ButtonRuntime::spawn(ButtonConfig::default(), |_| {
            SimulatedHost::new(Size::new(120, 40))
        })
        .unwrap();
        let handle = runtime.handle();

        let outcome = drive(&handle).await.unwrap();
        assert!(matches!(outcome, RequestOutcome::Ignored(_)));

        assert!(ButtonControl::click(&handle).await.unwrap());
        let snapshot = ButtonControl::snapshot(&handle).await.unwrap();
        assert!(snapshot.animating);
        assert_eq!(snapshot.state, ButtonState::Normal);
        assert!(ButtonControl::subscribe(&handle).borrow().animating);
    }
}

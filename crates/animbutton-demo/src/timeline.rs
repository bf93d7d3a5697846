//! Scripted state changes played after a click.

use animbutton_core::{ButtonError, ButtonState};
use animbutton_engine::RequestOutcome;
use animbutton_runtime::ButtonControl;
use std::time::Duration;

/// One scripted request: fire `target` after `at` steps.
pub type Cue = (u32, ButtonState);

/// Auto-loading button: the click already started loading.
pub const AUTO_SCRIPT: &[Cue] = &[
    (4, ButtonState::Success),
    (8, ButtonState::Normal),
    (12, ButtonState::Loading),
    (16, ButtonState::Failure),
    (20, ButtonState::Normal),
];

/// Button without auto-transition: the script starts loading itself. The
/// success cue lands while the loading choreography may still be in flight.
pub const CUSTOM_SCRIPT: &[Cue] = &[
    (2, ButtonState::Loading),
    (3, ButtonState::Success),
    (6, ButtonState::Normal),
];

/// Play `script` against `control`, one step being `step` long.
pub async fn play<C>(
    control: &C,
    script: &[Cue],
    step: Duration,
) -> Result<Vec<RequestOutcome>, ButtonError>
where
    C: ButtonControl + ?Sized,
{
    let start = tokio::time::Instant::now();
    let mut outcomes = Vec::with_capacity(script.len());

    for &(at, target) in script {
        tokio::time::sleep_until(start + step * at).await;
        let outcome = control.show(target).await?;
        tracing::info!("Cue {} -> {}: {:?}", at, target, outcome);
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

/// Length of a script including the final settle.
pub fn script_length(script: &[Cue], step: Duration, settle: Duration) -> Duration {
    let last = script.iter().map(|(at, _)| *at).max().unwrap_or(0);
    step * last + settle
}

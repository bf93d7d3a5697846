//! Button states and the transition graph between them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::visual::{Choreography, Resize, View};

// =============================================================================
// Button State
// =============================================================================

/// Logical state of the button. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonState {
    /// Expanded button showing its label.
    #[default]
    Normal,
    /// Collapsed button showing the spinner.
    Loading,
    /// Collapsed button showing the success glyph.
    Success,
    /// Collapsed button showing the failure glyph.
    Failure,
}

impl ButtonState {
    /// All states, in cycle order.
    pub const ALL: [ButtonState; 4] = [
        ButtonState::Normal,
        ButtonState::Loading,
        ButtonState::Success,
        ButtonState::Failure,
    ];

    /// The child visual that represents this state.
    pub fn visual(self) -> View {
        match self {
            ButtonState::Normal => View::Label,
            ButtonState::Loading => View::Spinner,
            ButtonState::Success => View::SuccessGlyph,
            ButtonState::Failure => View::FailureGlyph,
        }
    }

    /// Whether the body is collapsed to its square shape in this state.
    pub fn is_collapsed(self) -> bool {
        !matches!(self, ButtonState::Normal)
    }

    /// The transition an interaction fires from this state, if any.
    ///
    /// Only a resting button reacts; every other state has interaction disabled.
    pub fn auto_transition(self) -> Option<Transition> {
        match self {
            ButtonState::Normal => Some(Transition::NormalToLoading),
            _ => None,
        }
    }
}

impl fmt::Display for ButtonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ButtonState::Normal => "normal",
            ButtonState::Loading => "loading",
            ButtonState::Success => "success",
            ButtonState::Failure => "failure",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Transition
// =============================================================================

/// A legal edge of the state graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    NormalToLoading,
    LoadingToNormal,
    LoadingToSuccess,
    LoadingToFailure,
    SuccessToNormal,
    FailureToNormal,
}

impl Transition {
    /// Every legal edge.
    pub const ALL: [Transition; 6] = [
        Transition::NormalToLoading,
        Transition::LoadingToNormal,
        Transition::LoadingToSuccess,
        Transition::LoadingToFailure,
        Transition::SuccessToNormal,
        Transition::FailureToNormal,
    ];

    /// Look up the edge from `from` to `to`. `None` means the move is illegal.
    pub fn between(from: ButtonState, to: ButtonState) -> Option<Transition> {
        use ButtonState::*;

        match (from, to) {
            (Normal, Loading) => Some(Transition::NormalToLoading),
            (Loading, Normal) => Some(Transition::LoadingToNormal),
            (Loading, Success) => Some(Transition::LoadingToSuccess),
            (Loading, Failure) => Some(Transition::LoadingToFailure),
            (Success, Normal) => Some(Transition::SuccessToNormal),
            (Failure, Normal) => Some(Transition::FailureToNormal),
            _ => None,
        }
    }

    /// State the edge leaves.
    pub fn from(self) -> ButtonState {
        match self {
            Transition::NormalToLoading => ButtonState::Normal,
            Transition::LoadingToNormal
            | Transition::LoadingToSuccess
            | Transition::LoadingToFailure => ButtonState::Loading,
            Transition::SuccessToNormal => ButtonState::Success,
            Transition::FailureToNormal => ButtonState::Failure,
        }
    }

    /// State the edge commits once its choreography settles.
    pub fn to(self) -> ButtonState {
        match self {
            Transition::NormalToLoading => ButtonState::Loading,
            Transition::LoadingToSuccess => ButtonState::Success,
            Transition::LoadingToFailure => ButtonState::Failure,
            Transition::LoadingToNormal
            | Transition::SuccessToNormal
            | Transition::FailureToNormal => ButtonState::Normal,
        }
    }

    /// The sub-animations that realize this edge.
    ///
    /// The body collapses when leaving Normal and expands when returning to it;
    /// moves between collapsed states only cross-fade.
    pub fn choreography(self) -> Choreography {
        let (from, to) = (self.from(), self.to());
        let resize = match (from.is_collapsed(), to.is_collapsed()) {
            (false, true) => Some(Resize::Shrink),
            (true, false) => Some(Resize::Expand),
            _ => None,
        };

        Choreography {
            resize,
            fade_out: from.visual(),
            fade_in: to.visual(),
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from(), self.to())
    }
}

/// A requested move with no edge in the graph.
///
/// Dropping these is deliberate: the widget disables interaction while busy,
/// so a stray request must be ignored rather than surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IllegalTransition {
    pub from: ButtonState,
    pub to: ButtonState,
}

impl fmt::Display for IllegalTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no transition from {} to {}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_between_matches_table() {
        for transition in Transition::ALL {
            assert_eq!(
                Transition::between(transition.from(), transition.to()),
                Some(transition)
            );
        }
    }

    #[test]
    fn test_only_six_edges_are_legal() {
        let legal = ButtonState::ALL
            .iter()
            .flat_map(|from| ButtonState::ALL.iter().map(move |to| (*from, *to)))
            .filter(|(from, to)| Transition::between(*from, *to).is_some())
            .count();
        assert_eq!(legal, 6);
    }

    #[test]
    fn test_self_loops_are_illegal() {
        for state in ButtonState::ALL {
            assert_eq!(Transition::between(state, state), None);
        }
        assert_eq!(
            Transition::between(ButtonState::Success, ButtonState::Loading),
            None
        );
        assert_eq!(
            Transition::between(ButtonState::Normal, ButtonState::Success),
            None
        );
    }

    #[test]
    fn test_choreography_resize() {
        assert_eq!(
            Transition::NormalToLoading.choreography(),
            Choreography {
                resize: Some(Resize::Shrink),
                fade_out: View::Label,
                fade_in: View::Spinner,
            }
        );
        assert_eq!(
            Transition::FailureToNormal.choreography(),
            Choreography {
                resize: Some(Resize::Expand),
                fade_out: View::FailureGlyph,
                fade_in: View::Label,
            }
        );
        assert_eq!(Transition::LoadingToSuccess.choreography().resize, None);
        assert_eq!(Transition::LoadingToFailure.choreography().resize, None);
    }

    #[test]
    fn test_every_edge_cross_fades() {
        for transition in Transition::ALL {
            let choreography = transition.choreography();
            assert_ne!(choreography.fade_out, choreography.fade_in, "{}", transition);
        }
    }

    #[test]
    fn test_auto_transition_only_from_normal() {
        assert_eq!(
            ButtonState::Normal.auto_transition(),
            Some(Transition::NormalToLoading)
        );
        assert_eq!(ButtonState::Loading.auto_transition(), None);
        assert_eq!(ButtonState::Success.auto_transition(), None);
        assert_eq!(ButtonState::Failure.auto_transition(), None);
    }

    #[test]
    fn test_state_serde_lowercase() {
        let json = serde_json::to_string(&ButtonState::Success).unwrap();
        assert_eq!(json, "\"success\"");
        let state: ButtonState = serde_json::from_str("\"failure\"").unwrap();
        assert_eq!(state, ButtonState::Failure);
    }

    #[test]
    fn test_display() {
        assert_eq!(Transition::LoadingToNormal.to_string(), "loading -> normal");
        assert_eq!(
            IllegalTransition {
                from: ButtonState::Success,
                to: ButtonState::Loading
            }
            .to_string(),
            "no transition from success to loading"
        );
    }
}

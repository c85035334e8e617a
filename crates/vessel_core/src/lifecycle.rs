//! Application lifecycle state machine
//!
//! ```text
//!                 initialize
//!  NotInitialized ──────────▶ InitializedNotVisible ◀──┐
//!                                    │                 │ become_hidden
//!                     become_visible │                 │
//!                                    ▼                 │
//!                             VisibleNotActive ────────┘
//!                               │        ▲
//!                 become_active │        │ become_inactive
//!                               ▼        │
//!                             VisibleActive
//! ```
//!
//! `save_state` is a self-loop whose source state depends on the
//! [`SaveStatePolicy`]. `render` is a self-loop in either visible state.
//!
//! The machine only validates and records; running hooks and taking the
//! fatal path on a violation is the runtime's job.

use std::fmt;

use thiserror::Error;
use vessel_platform::{LifecycleRequest, SaveStatePolicy};

/// Where the application is in its lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Process started, `on_initialize` not yet run
    #[default]
    NotInitialized,
    /// Initialized but no surface on screen
    InitializedNotVisible,
    /// Surface on screen, no input focus
    VisibleNotActive,
    /// Surface on screen with input focus
    VisibleActive,
}

impl LifecycleState {
    /// Check if a surface is on screen
    pub fn is_visible(self) -> bool {
        matches!(
            self,
            LifecycleState::VisibleNotActive | LifecycleState::VisibleActive
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::NotInitialized => "NotInitialized",
            LifecycleState::InitializedNotVisible => "InitializedNotVisible",
            LifecycleState::VisibleNotActive => "VisibleNotActive",
            LifecycleState::VisibleActive => "VisibleActive",
        };
        f.write_str(name)
    }
}

/// A lifecycle entry point
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    Initialize,
    BecomeVisible,
    BecomeActive,
    BecomeInactive,
    SaveState,
    BecomeHidden,
    Render,
}

impl Transition {
    /// Entry point name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            Transition::Initialize => "initialize",
            Transition::BecomeVisible => "become_visible",
            Transition::BecomeActive => "become_active",
            Transition::BecomeInactive => "become_inactive",
            Transition::SaveState => "save_state",
            Transition::BecomeHidden => "become_hidden",
            Transition::Render => "render",
        }
    }

    /// The state this transition leads to from `from`, if it is legal there
    pub fn target(self, from: LifecycleState, policy: SaveStatePolicy) -> Option<LifecycleState> {
        use LifecycleState::*;

        match (self, from) {
            (Transition::Initialize, NotInitialized) => Some(InitializedNotVisible),
            (Transition::BecomeVisible, InitializedNotVisible) => Some(VisibleNotActive),
            (Transition::BecomeActive, VisibleNotActive) => Some(VisibleActive),
            (Transition::BecomeInactive, VisibleActive) => Some(VisibleNotActive),
            (Transition::BecomeHidden, VisibleNotActive) => Some(InitializedNotVisible),
            (Transition::SaveState, state) if state == save_state_source(policy) => Some(state),
            (Transition::Render, state) if state.is_visible() => Some(state),
            _ => None,
        }
    }
}

impl From<&LifecycleRequest> for Transition {
    fn from(request: &LifecycleRequest) -> Self {
        match request {
            LifecycleRequest::Initialize => Transition::Initialize,
            LifecycleRequest::BecomeVisible { .. } => Transition::BecomeVisible,
            LifecycleRequest::BecomeActive => Transition::BecomeActive,
            LifecycleRequest::BecomeInactive => Transition::BecomeInactive,
            LifecycleRequest::SaveState => Transition::SaveState,
            LifecycleRequest::BecomeHidden => Transition::BecomeHidden,
            LifecycleRequest::Render => Transition::Render,
        }
    }
}

/// The only state a save-state request is accepted in
pub fn save_state_source(policy: SaveStatePolicy) -> LifecycleState {
    match policy {
        SaveStatePolicy::WhileVisible => LifecycleState::VisibleNotActive,
        SaveStatePolicy::AfterHidden => LifecycleState::InitializedNotVisible,
    }
}

/// A transition was requested from a state where it is not legal
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("illegal lifecycle transition: {} while {state}", .transition.name())]
pub struct IllegalTransition {
    /// The requested entry point
    pub transition: Transition,
    /// The state the machine was in
    pub state: LifecycleState,
}

/// Lifecycle state plus the platform's save-state policy
#[derive(Debug, Clone)]
pub struct LifecycleMachine {
    state: LifecycleState,
    policy: SaveStatePolicy,
}

impl LifecycleMachine {
    /// Create a machine in `NotInitialized`
    pub fn new(policy: SaveStatePolicy) -> Self {
        Self {
            state: LifecycleState::NotInitialized,
            policy,
        }
    }

    /// Current state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Validate a transition without applying it
    ///
    /// Returns the successor state. The caller runs the hook and then calls
    /// [`commit`](Self::commit).
    pub fn check(&self, transition: Transition) -> Result<LifecycleState, IllegalTransition> {
        transition
            .target(self.state, self.policy)
            .ok_or(IllegalTransition {
                transition,
                state: self.state,
            })
    }

    /// Record the successor state returned by [`check`](Self::check)
    pub fn commit(&mut self, next: LifecycleState) {
        tracing::trace!("lifecycle {} -> {}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LifecycleState::*;

    const ALL_STATES: [LifecycleState; 4] = [
        NotInitialized,
        InitializedNotVisible,
        VisibleNotActive,
        VisibleActive,
    ];

    fn run(machine: &mut LifecycleMachine, transition: Transition) -> LifecycleState {
        let next = machine.check(transition).unwrap();
        machine.commit(next);
        next
    }

    #[test]
    fn test_transition_table() {
        let policy = SaveStatePolicy::WhileVisible;
        let table = [
            (Transition::Initialize, NotInitialized, InitializedNotVisible),
            (Transition::BecomeVisible, InitializedNotVisible, VisibleNotActive),
            (Transition::BecomeActive, VisibleNotActive, VisibleActive),
            (Transition::BecomeInactive, VisibleActive, VisibleNotActive),
            (Transition::SaveState, VisibleNotActive, VisibleNotActive),
            (Transition::BecomeHidden, VisibleNotActive, InitializedNotVisible),
        ];

        for (transition, from, to) in table {
            for state in ALL_STATES {
                let expected = if state == from { Some(to) } else { None };
                assert_eq!(
                    transition.target(state, policy),
                    expected,
                    "{} from {}",
                    transition.name(),
                    state
                );
            }
        }
    }

    #[test]
    fn test_render_only_while_visible() {
        let policy = SaveStatePolicy::WhileVisible;
        assert_eq!(Transition::Render.target(NotInitialized, policy), None);
        assert_eq!(Transition::Render.target(InitializedNotVisible, policy), None);
        assert_eq!(
            Transition::Render.target(VisibleNotActive, policy),
            Some(VisibleNotActive)
        );
        assert_eq!(
            Transition::Render.target(VisibleActive, policy),
            Some(VisibleActive)
        );
    }

    #[test]
    fn test_save_state_follows_policy() {
        let after_hidden = SaveStatePolicy::AfterHidden;
        assert_eq!(
            Transition::SaveState.target(InitializedNotVisible, after_hidden),
            Some(InitializedNotVisible)
        );
        assert_eq!(Transition::SaveState.target(VisibleNotActive, after_hidden), None);
        assert_eq!(Transition::SaveState.target(VisibleActive, after_hidden), None);
        assert_eq!(Transition::SaveState.target(NotInitialized, after_hidden), None);
    }

    #[test]
    fn test_full_cycle() {
        let mut machine = LifecycleMachine::new(SaveStatePolicy::WhileVisible);
        assert_eq!(machine.state(), NotInitialized);

        run(&mut machine, Transition::Initialize);
        run(&mut machine, Transition::BecomeVisible);
        run(&mut machine, Transition::BecomeActive);
        run(&mut machine, Transition::Render);
        assert_eq!(machine.state(), VisibleActive);

        run(&mut machine, Transition::BecomeInactive);
        run(&mut machine, Transition::SaveState);
        run(&mut machine, Transition::BecomeHidden);
        assert_eq!(machine.state(), InitializedNotVisible);

        // and back again
        run(&mut machine, Transition::BecomeVisible);
        assert_eq!(machine.state(), VisibleNotActive);
    }

    #[test]
    fn test_illegal_transition_leaves_state() {
        let machine = LifecycleMachine::new(SaveStatePolicy::WhileVisible);
        let err = machine.check(Transition::BecomeActive).unwrap_err();
        assert_eq!(err.transition, Transition::BecomeActive);
        assert_eq!(err.state, NotInitialized);
        assert_eq!(machine.state(), NotInitialized);
        assert_eq!(
            err.to_string(),
            "illegal lifecycle transition: become_active while NotInitialized"
        );
    }

    #[test]
    fn test_no_transition_skips_a_step() {
        // active can only be left through inactive
        let policy = SaveStatePolicy::WhileVisible;
        assert_eq!(Transition::BecomeHidden.target(VisibleActive, policy), None);
        assert_eq!(Transition::Initialize.target(VisibleActive, policy), None);
    }
}

use serde::{Deserialize, Serialize};

/// Playback execution states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlaybackState {
    #[default]
    Paused,
    Running,
}

impl PlaybackState {
    /// Check if transition from current state to target state is valid
    pub fn can_transition_to(&self, target: &PlaybackState) -> bool {
        use PlaybackState::*;

        matches!((self, target), (Paused, Running) | (Running, Paused))
    }

    /// Get human-readable state name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Paused => "Paused",
            Self::Running => "Running",
        }
    }

    pub fn is_running(&self) -> bool {
        *self == Self::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_paused() {
        assert_eq!(PlaybackState::default(), PlaybackState::Paused);
    }

    #[test]
    fn test_valid_transitions() {
        let paused = PlaybackState::Paused;
        let running = PlaybackState::Running;

        assert!(paused.can_transition_to(&running));
        assert!(running.can_transition_to(&paused));
        assert!(!paused.can_transition_to(&paused));
        assert!(!running.can_transition_to(&running));
    }
}

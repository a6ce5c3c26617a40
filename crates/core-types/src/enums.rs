use serde::{Deserialize, Serialize};

/// Identifies one of the two dropdowns of the pairwise comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    /// Returns the slot whose options are constrained by this one.
    pub fn partner(&self) -> Self {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }
}

/// Whether the heatmap animation is advancing on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

impl PlaybackState {
    /// The label of the button that switches away from this state.
    pub fn button_label(&self) -> &'static str {
        match self {
            PlaybackState::Stopped => "Play",
            PlaybackState::Playing => "Pause",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            PlaybackState::Stopped => PlaybackState::Playing,
            PlaybackState::Playing => PlaybackState::Stopped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partner_is_the_other_slot() {
        assert_eq!(Slot::First.partner(), Slot::Second);
        assert_eq!(Slot::Second.partner(), Slot::First);
    }

    #[test]
    fn label_names_the_next_action() {
        assert_eq!(PlaybackState::Stopped.button_label(), "Play");
        assert_eq!(PlaybackState::Playing.button_label(), "Pause");
        assert_eq!(PlaybackState::Playing.toggled(), PlaybackState::Stopped);
    }

    #[test]
    fn slot_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Slot::Second).unwrap(), "\"second\"");
    }
}

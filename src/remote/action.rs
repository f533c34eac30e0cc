//! Action vocabulary of the remote
//!
//! The bridge reports button events as raw action strings. Both wire encodings
//! end up in the same raw vocabulary, which is then collapsed into the small set
//! of [`CanonicalAction`]s the controller knows how to handle.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Normalized action produced for every inbound remote message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalAction {
    On,
    Off,
    BrightnessUp,
    BrightnessDown,
    BrightnessStop,
    SelectPrev,
    SelectNext,
    Unrecognized,
}

impl CanonicalAction {
    /// Arrow actions move the selection cursor instead of emitting commands
    pub fn is_navigation(self) -> bool {
        matches!(self, CanonicalAction::SelectPrev | CanonicalAction::SelectNext)
    }
}

impl Display for CanonicalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CanonicalAction::On => "on",
            CanonicalAction::Off => "off",
            CanonicalAction::BrightnessUp => "brightness_up",
            CanonicalAction::BrightnessDown => "brightness_down",
            CanonicalAction::BrightnessStop => "brightness_stop",
            CanonicalAction::SelectPrev => "select_prev",
            CanonicalAction::SelectNext => "select_next",
            CanonicalAction::Unrecognized => "unrecognized",
        };
        write!(f, "{}", name)
    }
}

/// Raw action strings the bridge publishes for the remote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawAction {
    On,
    Off,
    BrightnessMoveUp,
    BrightnessMoveDown,
    BrightnessStop,
    ArrowLeftClick,
    ArrowRightClick,
    ArrowLeftHold,
    ArrowRightHold,
    ArrowLeftRelease,
    ArrowRightRelease,
}

impl RawAction {
    /// Looks up a raw action by its wire name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        let raw = match name {
            "on" => RawAction::On,
            "off" => RawAction::Off,
            "brightness_move_up" => RawAction::BrightnessMoveUp,
            "brightness_move_down" => RawAction::BrightnessMoveDown,
            "brightness_stop" => RawAction::BrightnessStop,
            "arrow_left_click" => RawAction::ArrowLeftClick,
            "arrow_right_click" => RawAction::ArrowRightClick,
            "arrow_left_hold" => RawAction::ArrowLeftHold,
            "arrow_right_hold" => RawAction::ArrowRightHold,
            "arrow_left_release" => RawAction::ArrowLeftRelease,
            "arrow_right_release" => RawAction::ArrowRightRelease,
            _ => return None,
        };
        Some(raw)
    }

    /// Hold and release of the arrows are known but have no behavior attached.
    pub fn canonical(self) -> CanonicalAction {
        match self {
            RawAction::On => CanonicalAction::On,
            RawAction::Off => CanonicalAction::Off,
            RawAction::BrightnessMoveUp => CanonicalAction::BrightnessUp,
            RawAction::BrightnessMoveDown => CanonicalAction::BrightnessDown,
            RawAction::BrightnessStop => CanonicalAction::BrightnessStop,
            RawAction::ArrowLeftClick => CanonicalAction::SelectPrev,
            RawAction::ArrowRightClick => CanonicalAction::SelectNext,
            RawAction::ArrowLeftHold
            | RawAction::ArrowRightHold
            | RawAction::ArrowLeftRelease
            | RawAction::ArrowRightRelease => CanonicalAction::Unrecognized,
        }
    }
}

/// Maps a raw action name straight to its canonical action
pub fn canonical_from_name(name: &str) -> CanonicalAction {
    RawAction::parse(name)
        .map(RawAction::canonical)
        .unwrap_or(CanonicalAction::Unrecognized)
}

/// Which inbound wire encoding the remote topic carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicMode {
    /// `{"action": "<raw action>"}` straight from the bridge
    #[default]
    DirectBridge,
    /// `{"svalue1": "<level>", "LevelNames": "a|b|c"}` relayed by the host
    Host,
}

impl Display for TopicMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicMode::DirectBridge => write!(f, "DirectBridge"),
            TopicMode::Host => write!(f, "Host"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_map_to_canonical() {
        assert_eq!(canonical_from_name("on"), CanonicalAction::On);
        assert_eq!(canonical_from_name("off"), CanonicalAction::Off);
        assert_eq!(
            canonical_from_name("brightness_move_up"),
            CanonicalAction::BrightnessUp
        );
        assert_eq!(
            canonical_from_name("brightness_move_down"),
            CanonicalAction::BrightnessDown
        );
        assert_eq!(
            canonical_from_name("brightness_stop"),
            CanonicalAction::BrightnessStop
        );
        assert_eq!(
            canonical_from_name("arrow_left_click"),
            CanonicalAction::SelectPrev
        );
        assert_eq!(
            canonical_from_name("arrow_right_click"),
            CanonicalAction::SelectNext
        );
    }

    #[test]
    fn test_hold_and_release_are_unrecognized() {
        for name in [
            "arrow_left_hold",
            "arrow_right_hold",
            "arrow_left_release",
            "arrow_right_release",
        ] {
            assert!(RawAction::parse(name).is_some());
            assert_eq!(canonical_from_name(name), CanonicalAction::Unrecognized);
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(RawAction::parse("unknown_x"), None);
        assert_eq!(canonical_from_name("unknown_x"), CanonicalAction::Unrecognized);
    }

    #[test]
    fn test_navigation_flag() {
        assert!(CanonicalAction::SelectPrev.is_navigation());
        assert!(CanonicalAction::SelectNext.is_navigation());
        assert!(!CanonicalAction::On.is_navigation());
        assert!(!CanonicalAction::Unrecognized.is_navigation());
    }
}

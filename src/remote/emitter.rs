//! Command emitter
//!
//! Maps a canonical action and the current selection onto outgoing lighting
//! commands. Selecting `all` fans the same command out to every entry of the
//! device list, the sentinel's own `{base}/all/set` topic included.

use serde_json::json;
use std::fmt;

use super::action::CanonicalAction;
use super::cursor::{DeviceList, ALL_DEVICES};

/// Default brightness speed sent with `brightness_move`
pub const DEFAULT_BRIGHTNESS_STEP: i32 = 25;

/// Command object sent to a device's `set` topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    State(SwitchState),
    BrightnessMove(i32),
    Blink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    On,
    Off,
}

impl SwitchState {
    fn as_str(self) -> &'static str {
        match self {
            SwitchState::On => "on",
            SwitchState::Off => "off",
        }
    }
}

impl Command {
    /// JSON text published on the wire
    pub fn payload(&self) -> String {
        let body = match self {
            Command::State(state) => json!({ "state": state.as_str() }),
            Command::BrightnessMove(speed) => json!({ "brightness_move": speed }),
            Command::Blink => json!({ "effect": "blink" }),
        };
        body.to_string()
    }
}

/// One publish the controller hands to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub topic: String,
    pub command: Command,
}

impl OutgoingMessage {
    pub fn payload(&self) -> String {
        self.command.payload()
    }
}

impl fmt::Display for OutgoingMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.topic, self.payload())
    }
}

#[derive(Debug, Clone)]
pub struct CommandEmitter {
    base_topic: String,
    brightness_step: i32,
}

impl CommandEmitter {
    pub fn new(base_topic: impl Into<String>, brightness_step: i32) -> Self {
        Self {
            base_topic: base_topic.into(),
            brightness_step: brightness_step.saturating_abs(),
        }
    }

    /// `{base}/{device}/set`
    pub fn set_topic(&self, device: &str) -> String {
        format!("{}/{}/set", self.base_topic, device)
    }

    /// Builds the messages for a state or brightness action, in publish order.
    ///
    /// Navigation and unrecognized actions produce nothing.
    pub fn emit(
        &self,
        action: CanonicalAction,
        selected: &str,
        devices: &DeviceList,
    ) -> Vec<OutgoingMessage> {
        let Some(command) = self.command_for(action) else {
            return Vec::new();
        };

        if selected == ALL_DEVICES {
            devices
                .iter()
                .map(|device| self.message(device, command))
                .collect()
        } else {
            vec![self.message(selected, command)]
        }
    }

    /// Single blink addressed to one device, never fanned out
    pub fn blink(&self, device: &str) -> OutgoingMessage {
        self.message(device, Command::Blink)
    }

    fn command_for(&self, action: CanonicalAction) -> Option<Command> {
        match action {
            CanonicalAction::On => Some(Command::State(SwitchState::On)),
            CanonicalAction::Off => Some(Command::State(SwitchState::Off)),
            CanonicalAction::BrightnessUp => Some(Command::BrightnessMove(self.brightness_step)),
            CanonicalAction::BrightnessDown => {
                Some(Command::BrightnessMove(-self.brightness_step))
            }
            CanonicalAction::BrightnessStop => Some(Command::BrightnessMove(0)),
            CanonicalAction::SelectPrev
            | CanonicalAction::SelectNext
            | CanonicalAction::Unrecognized => None,
        }
    }

    fn message(&self, device: &str, command: Command) -> OutgoingMessage {
        OutgoingMessage {
            topic: self.set_topic(device),
            command,
        }
    }
}

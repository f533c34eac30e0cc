//! Controller - orchestrates decoder, cursor, reset scheduler and emitter
//!
//! Driven by two kinds of events, always dispatched one at a time by the host:
//!
//! ```text
//! on_inbound_message ──► ActionDecoder ──► arrow?  ──► SelectionCursor ──► blink
//!                                      └─► command ──► CommandEmitter ──► publish 1..n
//! on_tick ──────────────► ResetScheduler ──► SelectionCursor::reset (silent)
//! ```
//!
//! The controller owns its transport but never retries; per-message publish
//! failures are handed back to the caller.

use tracing::{debug, info, trace, warn};

use super::action::{CanonicalAction, TopicMode};
use super::cursor::{DeviceList, SelectionCursor};
use super::decoder::ActionDecoder;
use super::emitter::{CommandEmitter, OutgoingMessage, DEFAULT_BRIGHTNESS_STEP};
use super::error::TransportError;
use super::scheduler::ResetScheduler;

/// Narrow view of the messaging transport the controller needs.
///
/// Both calls hand the work to the transport and return immediately; delivery
/// is not awaited.
pub trait Transport {
    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError>;

    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), TransportError>;
}

/// Startup settings for the [`Controller`]
#[derive(Clone, Debug)]
pub struct ControllerSettings {
    /// Bridge base topic, e.g. `zigbee2mqtt`
    pub base_topic: String,
    /// Friendly name of the remote under the base topic
    pub remote: String,
    pub devices: DeviceList,
    /// Heartbeats without navigation before the selection returns to `all`; 0 disables
    pub reset_timeout_ticks: u32,
    pub topic_mode: TopicMode,
    pub brightness_step: i32,
}

impl ControllerSettings {
    pub fn new(
        base_topic: impl Into<String>,
        remote: impl Into<String>,
        devices: DeviceList,
    ) -> Self {
        Self {
            base_topic: base_topic.into(),
            remote: remote.into(),
            devices,
            reset_timeout_ticks: 1,
            topic_mode: TopicMode::default(),
            brightness_step: DEFAULT_BRIGHTNESS_STEP,
        }
    }
}

pub struct Controller<T: Transport> {
    remote_topic: String,
    decoder: ActionDecoder,
    cursor: SelectionCursor,
    scheduler: ResetScheduler,
    emitter: CommandEmitter,
    transport: T,
}

impl<T: Transport> Controller<T> {
    pub fn new(settings: ControllerSettings, transport: T) -> Self {
        info!(
            "Initializing remote controller for {}/{} with {} devices",
            settings.base_topic,
            settings.remote,
            settings.devices.len()
        );

        Self {
            remote_topic: format!("{}/{}", settings.base_topic, settings.remote),
            decoder: ActionDecoder::new(settings.topic_mode),
            cursor: SelectionCursor::new(settings.devices),
            scheduler: ResetScheduler::new(settings.reset_timeout_ticks),
            emitter: CommandEmitter::new(settings.base_topic, settings.brightness_step),
            transport,
        }
    }

    /// Topic the remote publishes its button events on
    pub fn remote_topic(&self) -> &str {
        &self.remote_topic
    }

    pub fn selected_device(&self) -> &str {
        self.cursor.current()
    }

    pub fn selection_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn reset_remaining(&self) -> Option<i64> {
        self.scheduler.remaining()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Subscribes to the remote topic; called on every (re)connect
    pub fn on_connected(&mut self) -> Result<(), TransportError> {
        info!("Connected, subscribing to {}", self.remote_topic);
        self.transport.subscribe(&self.remote_topic)
    }

    pub fn on_subscribed(&self) {
        info!("Subscribed to {}", self.remote_topic);
    }

    pub fn on_disconnected(&self) {
        warn!(
            "Disconnected, keeping selection {} until reconnect",
            self.cursor.current()
        );
    }

    /// Handles one inbound message and returns the publishes that failed.
    ///
    /// Decode errors drop the message without touching the selection.
    pub fn on_inbound_message(&mut self, topic: &str, payload: &str) -> Vec<TransportError> {
        if topic != self.remote_topic {
            debug!("Ignoring message on unrelated topic {}", topic);
            return Vec::new();
        }

        let action = match self.decoder.decode(payload) {
            Ok(action) => action,
            Err(e) => {
                warn!("Dropping remote message {}: {}", payload, e);
                return Vec::new();
            }
        };
        debug!("Remote action: {}", action);

        match action {
            CanonicalAction::SelectPrev | CanonicalAction::SelectNext => self.navigate(action),
            CanonicalAction::Unrecognized => {
                debug!("No behavior for remote message {}", payload);
                Vec::new()
            }
            _ => {
                let messages =
                    self.emitter
                        .emit(action, self.cursor.current(), self.cursor.devices());
                debug!("Sending {} to {} device(s)", action, messages.len());
                self.publish_all(messages)
            }
        }
    }

    /// Heartbeat; may silently reset the selection to `all`
    pub fn on_tick(&mut self) {
        if self.scheduler.tick() {
            info!("No navigation for a while, selection reset to all");
            self.cursor.reset();
        }
    }

    // Navigation restarts the reset countdown.
    fn navigate(&mut self, action: CanonicalAction) -> Vec<TransportError> {
        let blink_target = match action {
            CanonicalAction::SelectPrev => self.cursor.select_previous(),
            _ => self.cursor.select_next(),
        }
        .map(|device| self.emitter.blink(device));
        self.scheduler.reload();

        info!(
            "Selected {} ({}/{})",
            self.cursor.current(),
            self.cursor.index(),
            self.cursor.devices().len()
        );

        blink_target
            .map(|blink| self.publish_all(vec![blink]))
            .unwrap_or_default()
    }

    fn publish_all(&mut self, messages: Vec<OutgoingMessage>) -> Vec<TransportError> {
        messages
            .into_iter()
            .filter_map(|message| {
                trace!("Publishing {}", message);
                self.transport
                    .publish(&message.topic, &message.payload())
                    .err()
            })
            .collect()
    }
}

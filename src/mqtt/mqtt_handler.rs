//! Broker link with a typestate machine for the connection lifecycle
//!
//! ```text
//! Configured ──start──► Running ──stop──► Stopped
//!                         │  ▲
//!                         └──┘ next_event (connect, reconnect, receive)
//! ```
//!
//! `rumqttc` connects lazily: nothing happens on the wire until the event loop
//! is polled in [`MqttLink::next_event`]. Publishing goes through
//! [`MqttPublisher`], a cheap handle that never waits for the event loop.

use rumqttc::{
    AsyncClient, ConnectReturnCode, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS,
};
use std::marker::PhantomData;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};

use super::config::MqttConfig;
use super::message_manager::MQTTMessage;
use crate::remote::{Transport, TransportError};

const REQUEST_CAPACITY: usize = 100;
const MAX_ERROR_MESSAGES: usize = 10;
const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Failed,
    Reconnecting,
}

#[derive(Clone, Debug, Default)]
pub struct MQTTStatus {
    pub connection_state: ConnectionState,
    /// Most recent connection errors, oldest first
    pub error_messages: Vec<String>,
    pub messages_received: usize,
    pub messages_sent: usize,
    pub last_activity: Option<chrono::DateTime<chrono::Local>>,
}

impl MQTTStatus {
    fn touch(&mut self) {
        self.last_activity = Some(chrono::Local::now());
    }

    fn record_error(&mut self, message: String) {
        if self.error_messages.len() >= MAX_ERROR_MESSAGES {
            self.error_messages.remove(0);
        }
        self.error_messages.push(message);
    }
}

/// What the event loop produced, translated for the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    Connected,
    Subscribed,
    /// An established connection was lost
    Disconnected(String),
    /// A connection attempt failed while not connected
    Retrying(String),
    Message(MQTTMessage),
    Idle,
}

/// Marker for the lifecycle stage of an [`MqttLink`]
pub trait LinkState {}

/// Options built, not polled yet
#[derive(Debug, Clone)]
pub struct Configured;

/// Event loop being driven by the host
#[derive(Debug, Clone)]
pub struct Running;

/// Disconnect sent
#[derive(Debug, Clone)]
pub struct Stopped;

impl LinkState for Configured {}
impl LinkState for Running {}
impl LinkState for Stopped {}

pub struct MqttLink<S: LinkState> {
    client: AsyncClient,
    eventloop: EventLoop,
    config: MqttConfig,
    status: MQTTStatus,
    /// Earliest instant the event loop may be polled again after a failure
    retry_at: Option<Instant>,
    marker: PhantomData<S>,
}

impl<S: LinkState> MqttLink<S> {
    pub fn status(&self) -> &MQTTStatus {
        &self.status
    }

    pub fn config(&self) -> &MqttConfig {
        &self.config
    }

    /// Publishing handle sharing this link's request queue
    pub fn publisher(&self) -> MqttPublisher {
        MqttPublisher {
            client: self.client.clone(),
        }
    }

    fn transition<N: LinkState>(self) -> MqttLink<N> {
        MqttLink {
            client: self.client,
            eventloop: self.eventloop,
            config: self.config,
            status: self.status,
            retry_at: self.retry_at,
            marker: PhantomData,
        }
    }
}

impl MqttLink<Configured> {
    pub fn create(config: MqttConfig) -> Self {
        info!(
            "Configuring MQTT link to {}:{} as {}",
            config.host, config.port, config.client_id
        );

        let mut options =
            MqttOptions::new(config.client_id.clone(), config.host.clone(), config.port);
        options.set_keep_alive(config.keep_alive);
        if let Some((user, password)) = &config.credentials {
            debug!("Using credentials for user {}", user);
            options.set_credentials(user.clone(), password.clone());
        }

        let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);

        Self {
            client,
            eventloop,
            config,
            status: MQTTStatus::default(),
            retry_at: None,
            marker: PhantomData,
        }
    }

    pub fn start(mut self) -> MqttLink<Running> {
        info!("Starting MQTT link");
        self.status.connection_state = ConnectionState::Connecting;
        self.transition()
    }
}

impl MqttLink<Running> {
    /// Drives the event loop until it yields something.
    ///
    /// Cancel safe: a failed poll is reported right away and the reconnect
    /// delay is served at the start of the next call, so dropping this future
    /// mid-wait neither loses the event nor skips the delay.
    pub async fn next_event(&mut self) -> LinkEvent {
        if let Some(deadline) = self.retry_at {
            tokio::time::sleep_until(deadline).await;
            self.retry_at = None;
        }

        match self.eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                if ack.code == ConnectReturnCode::Success {
                    info!("Connected to {}:{}", self.config.host, self.config.port);
                    self.status.connection_state = ConnectionState::Connected;
                    self.status.touch();
                    LinkEvent::Connected
                } else {
                    let reason = format!("Connection refused: {:?}", ack.code);
                    error!("{}", reason);
                    self.status.connection_state = ConnectionState::Failed;
                    self.status.record_error(reason.clone());
                    LinkEvent::Retrying(reason)
                }
            }
            Ok(Event::Incoming(Packet::SubAck(_))) => LinkEvent::Subscribed,
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                self.status.messages_received += 1;
                self.status.touch();
                let content = String::from_utf8_lossy(&publish.payload).into_owned();
                let message = MQTTMessage::from_topic(publish.topic, content);
                trace!("Received {}", message);
                LinkEvent::Message(message)
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                self.status.connection_state = ConnectionState::Disconnected;
                LinkEvent::Disconnected("Broker sent disconnect".to_string())
            }
            Ok(Event::Outgoing(Outgoing::Publish(_))) => {
                self.status.messages_sent += 1;
                self.status.touch();
                LinkEvent::Idle
            }
            Ok(_) => LinkEvent::Idle,
            Err(e) => {
                let reason = e.to_string();
                let was_connected = self.status.connection_state == ConnectionState::Connected;
                self.status.connection_state = ConnectionState::Reconnecting;
                self.status.record_error(reason.clone());
                self.retry_at = Some(Instant::now() + self.config.reconnect_delay);

                if was_connected {
                    LinkEvent::Disconnected(reason)
                } else {
                    LinkEvent::Retrying(reason)
                }
            }
        }
    }

    /// Sends a disconnect and flushes it within a short grace period
    pub async fn stop(mut self) -> MqttLink<Stopped> {
        info!("Stopping MQTT link");

        if let Err(e) = self.client.try_disconnect() {
            warn!("Failed to queue disconnect: {}", e);
        } else {
            let flushed = tokio::time::timeout(DISCONNECT_TIMEOUT, async {
                loop {
                    match self.eventloop.poll().await {
                        Ok(Event::Outgoing(Outgoing::Disconnect)) | Err(_) => break,
                        Ok(_) => {}
                    }
                }
            })
            .await;
            if flushed.is_err() {
                debug!("Disconnect not flushed within {:?}", DISCONNECT_TIMEOUT);
            }
        }

        self.status.connection_state = ConnectionState::Disconnected;
        self.retry_at = None;
        self.transition()
    }
}

/// [`Transport`] over a `rumqttc` client handle.
///
/// Requests are queued with `try_*` and never awaited; a full queue is
/// reported as a failure for that single message.
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
}

impl Transport for MqttPublisher {
    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError> {
        self.client
            .try_subscribe(topic, QoS::AtMostOnce)
            .map_err(|e| TransportError::Subscribe {
                topic: topic.to_string(),
                reason: e.to_string(),
            })
    }

    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), TransportError> {
        self.client
            .try_publish(topic, QoS::AtMostOnce, false, payload.as_bytes().to_vec())
            .map_err(|e| TransportError::Publish {
                topic: topic.to_string(),
                reason: e.to_string(),
            })
    }
}

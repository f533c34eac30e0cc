//! # MQTT Transport Adapter
//!
//! Connects the remote core to the broker. The core only sees the narrow
//! [`crate::remote::Transport`] trait; connection handling, reconnects and
//! keep-alive stay in here.
//!
//! ```text
//! mqtt/
//! ├── config.rs           - Broker connection parameters
//! ├── message_manager.rs  - Inbound message representation
//! └── mqtt_handler.rs     - Link state machine and the Transport implementation
//! ```
//!
//! ## Flow
//!
//! 1. The host builds an [`mqtt_handler::MqttLink`] and hands its
//!    [`mqtt_handler::MqttPublisher`] to the controller
//! 2. The host polls the running link and forwards every
//!    [`mqtt_handler::LinkEvent`] to the controller
//! 3. On each connect the controller subscribes to the remote's topic again

pub mod config;
pub mod message_manager;
pub mod mqtt_handler;

pub use config::MqttConfig;
pub use message_manager::MQTTMessage;
pub use mqtt_handler::{ConnectionState, LinkEvent, MQTTStatus, MqttLink, MqttPublisher};

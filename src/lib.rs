//! Remote controller: drives lights from a wireless remote over MQTT.
//!
//! - [`remote`] holds the state machine that turns remote button events into
//!   device selection changes and lighting commands
//! - [`mqtt`] connects that core to a broker
//! - [`config`] loads the startup configuration

pub mod config;
pub mod mqtt;
pub mod remote;

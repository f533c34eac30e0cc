use std::time::Duration;

/// Broker connection parameters for the [`super::mqtt_handler::MqttLink`]
#[derive(Debug, Clone, PartialEq)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    /// User and password, if the broker wants them
    pub credentials: Option<(String, String)>,
    pub keep_alive: Duration,
    pub reconnect_delay: Duration,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 1883,
            client_id: "remotecontroller".to_string(),
            credentials: None,
            keep_alive: Duration::from_secs(5),
            reconnect_delay: Duration::from_secs(5),
        }
    }
}

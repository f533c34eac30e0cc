use remotecontroller::remote::{
    Controller, ControllerSettings, DeviceList, TopicMode, Transport, TransportError,
};

#[derive(Default)]
struct RecordingTransport {
    subscriptions: Vec<String>,
    published: Vec<(String, String)>,
    /// Publish attempts (0-based) that fail
    failing: Vec<usize>,
    attempts: usize,
}

impl Transport for RecordingTransport {
    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError> {
        self.subscriptions.push(topic.to_string());
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), TransportError> {
        let attempt = self.attempts;
        self.attempts += 1;
        if self.failing.contains(&attempt) {
            return Err(TransportError::Publish {
                topic: topic.to_string(),
                reason: "queue full".to_string(),
            });
        }
        self.published.push((topic.to_string(), payload.to_string()));
        Ok(())
    }
}

const REMOTE_TOPIC: &str = "zigbee2mqtt/styrbar";

fn settings(reset_timeout_ticks: u32) -> ControllerSettings {
    let mut settings =
        ControllerSettings::new("zigbee2mqtt", "styrbar", DeviceList::parse("lamp1;lamp2"));
    settings.reset_timeout_ticks = reset_timeout_ticks;
    settings
}

fn controller(reset_timeout_ticks: u32) -> Controller<RecordingTransport> {
    Controller::new(settings(reset_timeout_ticks), RecordingTransport::default())
}

fn action(name: &str) -> String {
    format!(r#"{{"action": "{}", "linkquality": 87}}"#, name)
}

fn published(controller: &Controller<RecordingTransport>) -> Vec<(&str, &str)> {
    controller
        .transport()
        .published
        .iter()
        .map(|(topic, payload)| (topic.as_str(), payload.as_str()))
        .collect()
}

#[test]
fn test_subscribes_to_remote_topic_on_connect() {
    let mut controller = controller(3);
    assert_eq!(controller.remote_topic(), REMOTE_TOPIC);

    controller.on_connected().expect("subscribe succeeds");
    controller.on_connected().expect("resubscribe succeeds");
    assert_eq!(
        controller.transport().subscriptions,
        vec![REMOTE_TOPIC.to_string(), REMOTE_TOPIC.to_string()]
    );
}

#[test]
fn test_on_fans_out_to_every_device_when_all_selected() {
    let mut controller = controller(3);
    let failures = controller.on_inbound_message(REMOTE_TOPIC, &action("on"));

    assert!(failures.is_empty());
    assert_eq!(
        published(&controller),
        vec![
            ("zigbee2mqtt/all/set", r#"{"state":"on"}"#),
            ("zigbee2mqtt/lamp1/set", r#"{"state":"on"}"#),
            ("zigbee2mqtt/lamp2/set", r#"{"state":"on"}"#),
        ]
    );
}

#[test]
fn test_navigation_blinks_and_targets_selected_device() {
    let mut controller = controller(3);

    controller.on_inbound_message(REMOTE_TOPIC, &action("arrow_right_click"));
    assert_eq!(controller.selected_device(), "lamp1");

    controller.on_inbound_message(REMOTE_TOPIC, &action("brightness_move_down"));
    assert_eq!(
        published(&controller),
        vec![
            ("zigbee2mqtt/lamp1/set", r#"{"effect":"blink"}"#),
            ("zigbee2mqtt/lamp1/set", r#"{"brightness_move":-25}"#),
        ]
    );
}

#[test]
fn test_navigating_onto_all_does_not_blink() {
    let mut controller = controller(3);

    controller.on_inbound_message(REMOTE_TOPIC, &action("arrow_left_click"));
    assert_eq!(controller.selected_device(), "lamp2");
    controller.on_inbound_message(REMOTE_TOPIC, &action("arrow_right_click"));
    assert_eq!(controller.selection_index(), 0);

    assert_eq!(
        published(&controller),
        vec![("zigbee2mqtt/lamp2/set", r#"{"effect":"blink"}"#)]
    );
}

#[test]
fn test_reset_after_timeout_is_silent() {
    let mut controller = controller(3);

    controller.on_inbound_message(REMOTE_TOPIC, &action("arrow_right_click"));
    assert_eq!(controller.selection_index(), 1);
    assert_eq!(published(&controller).len(), 1);

    controller.on_tick();
    controller.on_tick();
    assert_eq!(controller.selection_index(), 1);
    controller.on_tick();

    assert_eq!(controller.selection_index(), 0);
    assert_eq!(controller.reset_remaining(), Some(3));
    assert_eq!(published(&controller).len(), 1);
}

#[test]
fn test_navigation_restarts_reset_countdown() {
    let mut controller = controller(3);

    controller.on_tick();
    controller.on_tick();
    assert_eq!(controller.reset_remaining(), Some(1));

    controller.on_inbound_message(REMOTE_TOPIC, &action("arrow_right_click"));
    assert_eq!(controller.reset_remaining(), Some(3));

    controller.on_tick();
    assert_eq!(controller.selected_device(), "lamp1");
}

#[test]
fn test_disabled_reset_keeps_selection() {
    let mut controller = controller(0);
    controller.on_inbound_message(REMOTE_TOPIC, &action("arrow_right_click"));

    for _ in 0..100 {
        controller.on_tick();
    }
    assert_eq!(controller.selected_device(), "lamp1");
    assert_eq!(controller.reset_remaining(), None);
}

#[test]
fn test_foreign_topic_and_bad_payloads_are_dropped() {
    let mut controller = controller(3);
    controller.on_inbound_message(REMOTE_TOPIC, &action("arrow_right_click"));
    let before = published(&controller).len();

    controller.on_inbound_message("zigbee2mqtt/other_remote", &action("on"));
    controller.on_inbound_message(REMOTE_TOPIC, "garbage");
    controller.on_inbound_message(REMOTE_TOPIC, &action("arrow_left_hold"));
    controller.on_inbound_message(REMOTE_TOPIC, &action("unknown_x"));

    assert_eq!(published(&controller).len(), before);
    assert_eq!(controller.selected_device(), "lamp1");
}

#[test]
fn test_publish_failure_does_not_abort_batch() {
    let mut controller = controller(3);
    controller.transport_mut().failing = vec![1];

    let failures = controller.on_inbound_message(REMOTE_TOPIC, &action("off"));

    assert_eq!(failures.len(), 1);
    assert!(matches!(
        &failures[0],
        TransportError::Publish { topic, .. } if topic == "zigbee2mqtt/lamp1/set"
    ));
    assert_eq!(
        published(&controller),
        vec![
            ("zigbee2mqtt/all/set", r#"{"state":"off"}"#),
            ("zigbee2mqtt/lamp2/set", r#"{"state":"off"}"#),
        ]
    );
    assert_eq!(controller.selection_index(), 0);
}

#[test]
fn test_host_encoding_drives_same_behavior() {
    let mut settings = settings(3);
    settings.topic_mode = TopicMode::Host;
    let mut controller = Controller::new(settings, RecordingTransport::default());
    let levels = "Off|on|off|brightness_move_up|brightness_move_down|brightness_stop|arrow_left_click|arrow_right_click";

    let before_table = controller.on_inbound_message(REMOTE_TOPIC, r#"{"svalue1": "70"}"#);
    assert!(before_table.is_empty());
    assert_eq!(controller.selection_index(), 0);

    let next = format!(r#"{{"svalue1": "70", "LevelNames": "{}"}}"#, levels);
    controller.on_inbound_message(REMOTE_TOPIC, &next);
    assert_eq!(controller.selected_device(), "lamp1");

    controller.on_inbound_message(REMOTE_TOPIC, r#"{"svalue1": "30"}"#);
    assert_eq!(
        published(&controller),
        vec![
            ("zigbee2mqtt/lamp1/set", r#"{"effect":"blink"}"#),
            ("zigbee2mqtt/lamp1/set", r#"{"brightness_move":25}"#),
        ]
    );
}

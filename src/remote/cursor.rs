//! Device list and the rotating selection cursor over it

use tracing::debug;

/// Pseudo-device that stands for every configured device
pub const ALL_DEVICES: &str = "all";

/// Ordered device names with the `all` sentinel at index 0.
///
/// Built once at startup and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceList {
    devices: Vec<String>,
}

impl DeviceList {
    /// Creates the list from configured names, prepending the sentinel
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut devices = vec![ALL_DEVICES.to_string()];
        devices.extend(names.into_iter().map(Into::into));
        Self { devices }
    }

    /// Splits a semicolon separated name list, dropping blank entries
    pub fn parse(names: &str) -> Self {
        Self::new(
            names
                .split(';')
                .map(str::trim)
                .filter(|name| !name.is_empty()),
        )
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Never true, the sentinel is always present
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.devices.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.devices.iter().map(String::as_str)
    }
}

/// Circular cursor over a [`DeviceList`].
///
/// Navigation reports which device should confirm the change with a blink:
/// the newly selected one, unless the cursor landed on the `all` sentinel.
/// [`SelectionCursor::reset`] never asks for a blink.
#[derive(Debug, Clone)]
pub struct SelectionCursor {
    devices: DeviceList,
    index: usize,
}

impl SelectionCursor {
    pub fn new(devices: DeviceList) -> Self {
        Self { devices, index: 0 }
    }

    pub fn select_previous(&mut self) -> Option<&str> {
        self.index = match self.index {
            0 => self.devices.len() - 1,
            index => index - 1,
        };
        debug!("Selected previous device: {}", self.current());
        self.blink_target()
    }

    pub fn select_next(&mut self) -> Option<&str> {
        self.index = (self.index + 1) % self.devices.len();
        debug!("Selected next device: {}", self.current());
        self.blink_target()
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn current(&self) -> &str {
        self.devices.get(self.index).unwrap_or(ALL_DEVICES)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn devices(&self) -> &DeviceList {
        &self.devices
    }

    fn blink_target(&self) -> Option<&str> {
        (self.index != 0).then(|| self.current())
    }
}

//! # Remote Control Core
//!
//! Translates button events of a wireless remote into lighting commands. The
//! remote's events arrive on `{base}/{remote}`; commands leave on
//! `{base}/{device}/set`.
//!
//! ```text
//! remote/
//! ├── action.rs      - Raw and canonical action vocabulary, wire encodings
//! ├── decoder.rs     - Payload to CanonicalAction, level name table
//! ├── cursor.rs      - Device list and rotating selection
//! ├── scheduler.rs   - Heartbeat countdown back to `all`
//! ├── emitter.rs     - CanonicalAction to outgoing set messages
//! ├── controller.rs  - Orchestration and the Transport seam
//! └── error.rs       - Decode and transport errors
//! ```
//!
//! ## Button Layout
//!
//! - **left / right arrow**: previous / next device, the new device blinks
//! - **on / off**: switch the selected device (or every device)
//! - **brightness up / down**: start dimming, release stops it
//!
//! All state lives inside one [`Controller`] and is process-lifetime only.

pub mod action;
pub mod controller;
pub mod cursor;
pub mod decoder;
pub mod emitter;
pub mod error;
pub mod scheduler;

pub use action::{CanonicalAction, RawAction, TopicMode};
pub use controller::{Controller, ControllerSettings, Transport};
pub use cursor::{DeviceList, SelectionCursor, ALL_DEVICES};
pub use decoder::{ActionDecoder, LevelNameTable};
pub use emitter::{Command, CommandEmitter, OutgoingMessage, DEFAULT_BRIGHTNESS_STEP};
pub use error::{DecodeError, TransportError};
pub use scheduler::ResetScheduler;

pub mod hub;

pub use hub::{EventHub, RealtimeEvent};

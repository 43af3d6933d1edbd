// Purpose: the complete instrument voice and the messages that drive it

pub mod config;
pub mod message;
pub mod voice;

pub use config::{ConfigError, VoiceConfig};
pub use message::{ControlMessage, ControlState, MessageReceiver};
pub use voice::DuettoVoice;

//! Equipment notifications sent to field hardware over UDP.

pub mod message;
pub mod notifier;

pub use message::EquipmentCode;
pub use notifier::{BROADCAST_ADDR, DEFAULT_PORT, Notifier, NotifyError, UdpNotifier};

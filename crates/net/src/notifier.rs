use async_trait::async_trait;
use thiserror::Error;
use tokio::net::UdpSocket;

use crate::message::EquipmentCode;

/// Port the field hardware listens on for equipment codes.
pub const DEFAULT_PORT: u16 = 7500;

/// Target that requires `SO_BROADCAST` on the sending socket.
pub const BROADCAST_ADDR: &str = "255.255.255.255";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("could not open UDP socket: {0}")]
    Bind(#[source] std::io::Error),
    #[error("could not enable broadcast: {0}")]
    Broadcast(#[source] std::io::Error),
    #[error("UDP send to {target} failed: {source}")]
    Send {
        target: String,
        #[source]
        source: std::io::Error,
    },
}

/// Delivers an equipment code to a target host.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, target_ip: &str, code: EquipmentCode) -> Result<(), NotifyError>;
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    async fn notify(&self, target_ip: &str, code: EquipmentCode) -> Result<(), NotifyError> {
        (**self).notify(target_ip, code).await
    }
}

/// Fire-and-forget UDP sender. Each notification opens its own socket,
/// sends one datagram and drops the socket; nothing is acknowledged.
#[derive(Debug, Clone, Copy)]
pub struct UdpNotifier {
    port: u16,
}

impl UdpNotifier {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Default for UdpNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_PORT)
    }
}

/// Ephemeral socket for one notification; broadcast is enabled only for
/// [`BROADCAST_ADDR`].
async fn sending_socket(target_ip: &str) -> Result<UdpSocket, NotifyError> {
    let socket = UdpSocket::bind(("0.0.0.0", 0))
        .await
        .map_err(NotifyError::Bind)?;
    if target_ip == BROADCAST_ADDR {
        socket.set_broadcast(true).map_err(NotifyError::Broadcast)?;
    }
    Ok(socket)
}

#[async_trait]
impl Notifier for UdpNotifier {
    async fn notify(&self, target_ip: &str, code: EquipmentCode) -> Result<(), NotifyError> {
        let socket = sending_socket(target_ip).await?;
        let target = format!("{target_ip}:{}", self.port);
        socket
            .send_to(&code.encode(), (target_ip, self.port))
            .await
            .map_err(|source| NotifyError::Send {
                target: target.clone(),
                source,
            })?;
        log::info!("sent equipment code '{code}' to {target}");
        Ok(())
    }
}

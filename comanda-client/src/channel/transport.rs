//! Channel transport abstraction
//!
//! Frame layout on the wire: event type (1 byte) + request id (16 bytes)
//! + payload length (4 bytes, LE) + JSON payload.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex, broadcast};
use uuid::Uuid;

use super::ChannelError;
use shared::message::{ChannelMessage, EventType};

/// Upper bound on a single frame's payload
const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Transport abstraction for channel communication
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn read_message(&self) -> Result<ChannelMessage, ChannelError>;
    async fn write_message(&self, msg: &ChannelMessage) -> Result<(), ChannelError>;
    async fn close(&self) -> Result<(), ChannelError>;
}

/// TCP Transport Implementation
#[derive(Debug, Clone)]
pub struct TcpTransport {
    reader: Arc<Mutex<OwnedReadHalf>>,
    writer: Arc<Mutex<OwnedWriteHalf>>,
}

impl TcpTransport {
    pub async fn connect(addr: &str) -> Result<Self, ChannelError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| ChannelError::Connection(e.to_string()))?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader: Arc::new(Mutex::new(reader)),
            writer: Arc::new(Mutex::new(writer)),
        })
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn read_message(&self) -> Result<ChannelMessage, ChannelError> {
        let mut reader = self.reader.lock().await;

        // Read event type (1 byte)
        let mut type_buf = [0u8; 1];
        reader
            .read_exact(&mut type_buf)
            .await
            .map_err(ChannelError::Io)?;

        let event_type = EventType::try_from(type_buf[0])
            .map_err(|_| ChannelError::InvalidFrame("Invalid event type".into()))?;

        // Read request ID (16 bytes)
        let mut uuid_buf = [0u8; 16];
        reader
            .read_exact(&mut uuid_buf)
            .await
            .map_err(ChannelError::Io)?;
        let request_id = Uuid::from_bytes(uuid_buf);

        // Read payload length (4 bytes)
        let mut len_buf = [0u8; 4];
        reader
            .read_exact(&mut len_buf)
            .await
            .map_err(ChannelError::Io)?;

        let len = u32::from_le_bytes(len_buf) as usize;
        if len > MAX_FRAME_LEN {
            return Err(ChannelError::InvalidFrame(format!(
                "Frame length {len} exceeds limit"
            )));
        }

        // Read payload
        let mut payload = vec![0u8; len];
        reader
            .read_exact(&mut payload)
            .await
            .map_err(ChannelError::Io)?;

        Ok(ChannelMessage {
            request_id,
            event_type,
            payload,
        })
    }

    async fn write_message(&self, msg: &ChannelMessage) -> Result<(), ChannelError> {
        let mut writer = self.writer.lock().await;
        let mut data = Vec::with_capacity(21 + msg.payload.len());
        data.push(msg.event_type as u8);
        data.extend_from_slice(msg.request_id.as_bytes());
        data.extend_from_slice(&(msg.payload.len() as u32).to_le_bytes());
        data.extend_from_slice(&msg.payload);

        writer.write_all(&data).await.map_err(ChannelError::Io)?;
        Ok(())
    }

    async fn close(&self) -> Result<(), ChannelError> {
        let mut writer = self.writer.lock().await;
        writer.shutdown().await.map_err(ChannelError::Io)?;
        Ok(())
    }
}

/// Memory Transport Implementation (for in-process communication and
/// tests — no real socket required)
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    /// Receiver for messages FROM the push service
    rx: Arc<Mutex<broadcast::Receiver<ChannelMessage>>>,
    /// Sender for messages TO the push service
    tx: broadcast::Sender<ChannelMessage>,
}

impl MemoryTransport {
    /// Create a new memory transport
    ///
    /// # Arguments
    /// * `server_broadcast_tx` - The push side's broadcast sender (to subscribe to events)
    /// * `client_to_server_tx` - The channel to send messages TO the push side
    pub fn new(
        server_broadcast_tx: &broadcast::Sender<ChannelMessage>,
        client_to_server_tx: &broadcast::Sender<ChannelMessage>,
    ) -> Self {
        Self::from_receiver(server_broadcast_tx.subscribe(), client_to_server_tx.clone())
    }

    /// Build from an existing subscription. Holding a receiver rather
    /// than a sender keeps the push side's channel lifetime in the push
    /// side's hands: dropping its sender reads as a transport error here.
    pub fn from_receiver(
        rx: broadcast::Receiver<ChannelMessage>,
        tx: broadcast::Sender<ChannelMessage>,
    ) -> Self {
        Self {
            rx: Arc::new(Mutex::new(rx)),
            tx,
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn read_message(&self) -> Result<ChannelMessage, ChannelError> {
        let mut rx = self.rx.lock().await;
        rx.recv()
            .await
            .map_err(|e| ChannelError::Connection(format!("Memory channel error: {e}")))
    }

    async fn write_message(&self, msg: &ChannelMessage) -> Result<(), ChannelError> {
        self.tx
            .send(msg.clone())
            .map_err(|e| ChannelError::Connection(format!("Failed to send to server: {e}")))?;
        Ok(())
    }

    async fn close(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}

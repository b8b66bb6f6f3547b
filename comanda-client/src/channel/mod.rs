//! Realtime Channel Manager
//!
//! Owns the lifecycle of the push-event connection: connect on credential
//! availability, disconnect on credential loss or teardown, and route
//! inbound events to the order store. The manager is a transport adapter,
//! not a decision point — every event maps 1:1 onto a store merge
//! operation.
//!
//! Connection errors never propagate to callers; they are observable
//! only through the [`ConnectionState`] watch. Delivery is not
//! exactly-once: the store's merge operations are idempotent, which is
//! the recovery mechanism after a reconnect.

pub mod transport;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{Mutex, broadcast, watch};
use tokio_util::sync::CancellationToken;

use crate::store::SharedOrderStore;
use shared::message::{
    ChannelMessage, EventType, HandshakePayload, NotificationPayload, OrderEventPayload,
    PROTOCOL_VERSION,
};
use transport::{MemoryTransport, TcpTransport, Transport};

/// Channel error type
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Connection failed or dropped
    #[error("Connection error: {0}")]
    Connection(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed frame
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Connection state surfaced to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Creates transports on demand (credential rotation reconnects with a
/// fresh one)
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn Transport>, ChannelError>;
}

/// TCP connector
#[derive(Debug, Clone)]
pub struct TcpConnector {
    addr: String,
}

impl TcpConnector {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }
}

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self) -> Result<Box<dyn Transport>, ChannelError> {
        Ok(Box::new(TcpTransport::connect(&self.addr).await?))
    }
}

/// In-memory connector (tests and in-process embedding)
#[derive(Debug)]
pub struct MemoryConnector {
    server_rx: broadcast::Receiver<ChannelMessage>,
    client_tx: broadcast::Sender<ChannelMessage>,
}

impl MemoryConnector {
    pub fn new(
        server_tx: &broadcast::Sender<ChannelMessage>,
        client_tx: &broadcast::Sender<ChannelMessage>,
    ) -> Self {
        Self {
            server_rx: server_tx.subscribe(),
            client_tx: client_tx.clone(),
        }
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self) -> Result<Box<dyn Transport>, ChannelError> {
        // Fresh subscription per connection, starting at the stream tail
        Ok(Box::new(MemoryTransport::from_receiver(
            self.server_rx.resubscribe(),
            self.client_tx.clone(),
        )))
    }
}

struct ActiveConnection {
    id: u64,
    transport: Arc<dyn Transport>,
    cancel: CancellationToken,
}

type ActiveSlot = Arc<Mutex<Option<ActiveConnection>>>;

/// Handle to an open channel; `close()` releases the transport
/// deterministically. Closing a connection that has already been torn
/// down is a no-op.
pub struct ChannelHandle {
    id: u64,
    active: ActiveSlot,
    state_tx: Arc<watch::Sender<ConnectionState>>,
}

impl ChannelHandle {
    pub async fn close(&self) {
        teardown(&self.active, &self.state_tx, Some(self.id)).await;
    }
}

/// Realtime channel manager, scoped to one business session
pub struct ChannelManager {
    store: SharedOrderStore,
    business: String,
    client_name: String,
    connector: Arc<dyn Connector>,
    credential: Mutex<Option<String>>,
    active: ActiveSlot,
    conn_counter: AtomicU64,
    state_tx: Arc<watch::Sender<ConnectionState>>,
    notification_tx: broadcast::Sender<NotificationPayload>,
}

impl ChannelManager {
    pub fn new(
        store: SharedOrderStore,
        business: impl Into<String>,
        connector: Arc<dyn Connector>,
    ) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        let (notification_tx, _) = broadcast::channel(64);
        Self {
            store,
            business: business.into(),
            client_name: "comanda-client".to_string(),
            connector,
            credential: Mutex::new(None),
            active: Arc::new(Mutex::new(None)),
            conn_counter: AtomicU64::new(0),
            state_tx: Arc::new(state_tx),
            notification_tx,
        }
    }

    /// Set the client name reported at handshake
    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into();
        self
    }

    /// Observe connection state changes
    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    pub fn is_connected(&self) -> bool {
        *self.state_tx.borrow() == ConnectionState::Connected
    }

    /// Subscribe to operator-facing notifications pushed over the channel
    pub fn notifications(&self) -> broadcast::Receiver<NotificationPayload> {
        self.notification_tx.subscribe()
    }

    /// Replace the credential.
    ///
    /// `None` disconnects. A new credential while connected tears the
    /// connection down and re-establishes it — no rotation without
    /// reconnect.
    pub async fn set_credential(&self, credential: Option<String>) {
        {
            let mut current = self.credential.lock().await;
            if *current == credential {
                return;
            }
            *current = credential.clone();
        }

        teardown(&self.active, &self.state_tx, None).await;
        if credential.is_some() {
            self.connect().await;
        }
    }

    /// Open the channel.
    ///
    /// Without a credential this performs no connection attempt and
    /// returns `None`. Connection failures are logged, reflected in the
    /// state watch, and also return `None` — never an error.
    pub async fn connect(&self) -> Option<ChannelHandle> {
        let token = {
            let credential = self.credential.lock().await;
            match credential.as_ref() {
                Some(token) => token.clone(),
                None => {
                    tracing::debug!("No credential present, staying disconnected");
                    return None;
                }
            }
        };

        {
            let active = self.active.lock().await;
            if let Some(conn) = active.as_ref() {
                tracing::debug!("Channel already connected");
                return Some(ChannelHandle {
                    id: conn.id,
                    active: self.active.clone(),
                    state_tx: self.state_tx.clone(),
                });
            }
        }

        self.state_tx.send_replace(ConnectionState::Connecting);

        match self.try_connect(token).await {
            Ok(conn) => {
                let handle = ChannelHandle {
                    id: conn.id,
                    active: self.active.clone(),
                    state_tx: self.state_tx.clone(),
                };
                *self.active.lock().await = Some(conn);
                self.state_tx.send_replace(ConnectionState::Connected);
                Some(handle)
            }
            Err(e) => {
                tracing::warn!("Channel connect failed: {e}");
                self.state_tx.send_replace(ConnectionState::Disconnected);
                None
            }
        }
    }

    /// Tear down the channel (component teardown / logout)
    pub async fn close(&self) {
        teardown(&self.active, &self.state_tx, None).await;
    }

    async fn try_connect(&self, token: String) -> Result<ActiveConnection, ChannelError> {
        let transport: Arc<dyn Transport> = Arc::from(self.connector.connect().await?);

        let payload = HandshakePayload {
            version: PROTOCOL_VERSION,
            token,
            business: self.business.clone(),
            client_name: Some(self.client_name.clone()),
        };
        transport
            .write_message(&ChannelMessage::handshake(&payload))
            .await?;

        let id = self.conn_counter.fetch_add(1, Ordering::SeqCst) + 1;
        let cancel = CancellationToken::new();
        let conn = ActiveConnection {
            id,
            transport: transport.clone(),
            cancel: cancel.clone(),
        };

        // Read loop: routes inbound frames until cancelled or the
        // transport drops
        let store = self.store.clone();
        let notification_tx = self.notification_tx.clone();
        let active = self.active.clone();
        let state_tx = self.state_tx.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    msg = transport.read_message() => match msg {
                        Ok(msg) => route_message(&store, &notification_tx, msg).await,
                        Err(e) => {
                            tracing::warn!("Channel transport error: {e}");
                            teardown(&active, &state_tx, Some(id)).await;
                            break;
                        }
                    }
                }
            }
            tracing::debug!(conn_id = id, "Channel read loop exited");
        });

        Ok(conn)
    }
}

/// Release the active connection and flip the state watch. With a
/// connection id, only that connection is torn down — a stale read loop
/// cannot clobber its replacement.
async fn teardown(active: &ActiveSlot, state_tx: &watch::Sender<ConnectionState>, id: Option<u64>) {
    let conn = {
        let mut slot = active.lock().await;
        let matches = match (slot.as_ref(), id) {
            (Some(conn), Some(id)) => conn.id == id,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if matches { slot.take() } else { None }
    };

    if let Some(conn) = conn {
        conn.cancel.cancel();
        if let Err(e) = conn.transport.close().await {
            tracing::debug!("Transport close error: {e}");
        }
        state_tx.send_replace(ConnectionState::Disconnected);
    }
}

/// Dispatch one inbound frame. Malformed payloads are logged and
/// dropped; the channel stays up.
async fn route_message(
    store: &SharedOrderStore,
    notification_tx: &broadcast::Sender<NotificationPayload>,
    msg: ChannelMessage,
) {
    match msg.event_type {
        EventType::OrderEvent => match msg.parse_payload::<OrderEventPayload>() {
            Ok(event) => apply_order_event(store, event).await,
            Err(e) => tracing::warn!("Malformed order event payload: {e}"),
        },
        EventType::Notification => match msg.parse_payload::<NotificationPayload>() {
            Ok(notification) => {
                // no subscribers is fine
                let _ = notification_tx.send(notification);
            }
            Err(e) => tracing::warn!("Malformed notification payload: {e}"),
        },
        EventType::Handshake => {
            tracing::debug!("Unexpected handshake frame from server, ignoring");
        }
    }
}

/// Map an order event onto the store's merge API. Shared by the channel
/// read loop and local optimistic mutations so both paths converge on
/// the same last-write-wins semantics.
pub async fn apply_order_event(store: &SharedOrderStore, event: OrderEventPayload) {
    let mut store = store.write().await;
    match event {
        OrderEventPayload::OrderCreated { order } => store.upsert_one(order),
        OrderEventPayload::OrderUpdated { order_id, patch } => {
            store.apply_patch(&order_id, &patch);
        }
        OrderEventPayload::OrderRemoved { order_id } => {
            store.remove(&order_id);
        }
        OrderEventPayload::OrdersByStatus { status, orders } => {
            store.upsert_by_status(orders, status)
        }
    }
}

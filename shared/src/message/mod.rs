//! 实时通道消息类型定义
//!
//! engine 与推送服务之间共享，用于进程内（内存）和网络（TCP）通信。
//! 帧格式由客户端 transport 层负责；这里只定义消息体与载荷。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use uuid::Uuid;

pub mod payload;
pub use payload::*;

/// 协议版本号
pub const PROTOCOL_VERSION: u16 = 1;

/// 通道事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// 握手消息（携带凭证）
    Handshake = 0,
    /// 订单事件
    OrderEvent = 1,
    /// 系统通知
    Notification = 2,
}

impl TryFrom<u8> for EventType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EventType::Handshake),
            1 => Ok(EventType::OrderEvent),
            2 => Ok(EventType::Notification),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Handshake => write!(f, "handshake"),
            EventType::OrderEvent => write!(f, "order_event"),
            EventType::Notification => write!(f, "notification"),
        }
    }
}

/// 通道消息体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub request_id: Uuid,
    pub event_type: EventType,
    pub payload: Vec<u8>,
}

impl ChannelMessage {
    pub fn new(event_type: EventType, payload: Vec<u8>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            event_type,
            payload,
        }
    }

    /// 创建握手消息
    pub fn handshake(payload: &HandshakePayload) -> Self {
        Self::new(
            EventType::Handshake,
            serde_json::to_vec(payload).expect("Failed to serialize handshake payload"),
        )
    }

    /// 创建订单事件消息
    pub fn order_event(payload: &OrderEventPayload) -> Self {
        Self::new(
            EventType::OrderEvent,
            serde_json::to_vec(payload).expect("Failed to serialize order event"),
        )
    }

    /// 创建通知消息
    pub fn notification(payload: &NotificationPayload) -> Self {
        Self::new(
            EventType::Notification,
            serde_json::to_vec(payload).expect("Failed to serialize notification"),
        )
    }

    /// 解析载荷为指定类型
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;

    #[test]
    fn test_event_type_roundtrip() {
        for event_type in [
            EventType::Handshake,
            EventType::OrderEvent,
            EventType::Notification,
        ] {
            assert_eq!(EventType::try_from(event_type as u8), Ok(event_type));
        }
        assert!(EventType::try_from(9).is_err());
    }

    #[test]
    fn test_handshake_message() {
        let payload = HandshakePayload {
            version: PROTOCOL_VERSION,
            token: "bearer-xyz".to_string(),
            business: "biz-1".to_string(),
            client_name: Some("test-client".to_string()),
        };

        let msg = ChannelMessage::handshake(&payload);
        assert_eq!(msg.event_type, EventType::Handshake);
        assert!(!msg.request_id.is_nil());

        let parsed: HandshakePayload = msg.parse_payload().unwrap();
        assert_eq!(parsed.version, PROTOCOL_VERSION);
        assert_eq!(parsed.business, "biz-1");
    }

    #[test]
    fn test_order_event_tagged_encoding() {
        let payload = OrderEventPayload::OrderRemoved {
            order_id: "order-7".to_string(),
        };
        let msg = ChannelMessage::order_event(&payload);

        let value: serde_json::Value = serde_json::from_slice(&msg.payload).unwrap();
        assert_eq!(value["event"], "order-removed");

        let parsed: OrderEventPayload = msg.parse_payload().unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn test_orders_by_status_encoding() {
        let payload = OrderEventPayload::OrdersByStatus {
            status: OrderStatus::Pending,
            orders: vec![],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["event"], "orders-by-status");
        assert_eq!(value["status"], "PENDING");
    }
}

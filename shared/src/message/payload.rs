use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Order, OrderPatch, OrderStatus};

// ==================== Notification Level ====================

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// 普通信息
    Info,
    /// 警告
    Warning,
    /// 错误
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

// ==================== Payloads ====================

/// 握手载荷 (客户端 -> 推送服务)
///
/// 第一帧，携带协议版本、bearer 凭证和订阅的 business。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandshakePayload {
    /// 协议版本
    pub version: u16,
    /// Bearer 凭证 (对 engine 不透明)
    pub token: String,
    /// 订阅的 business (String ID)
    pub business: String,
    /// 客户端名称/标识
    pub client_name: Option<String>,
}

/// 订单事件载荷 (推送服务 -> 客户端)
///
/// 每个事件对应 store 的一个 merge 操作，路由层不做业务判断。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum OrderEventPayload {
    /// 新订单
    OrderCreated { order: Order },
    /// 订单部分更新 (状态/字段变更、单品就绪)
    OrderUpdated { order_id: String, patch: OrderPatch },
    /// 订单移除
    OrderRemoved { order_id: String },
    /// 按状态全量对账 — 该状态当前的权威集合
    OrdersByStatus {
        status: OrderStatus,
        orders: Vec<Order>,
    },
}

/// 通知载荷 (推送服务 -> 客户端)
///
/// 用于向操作员展示系统状态或业务提示。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// 标题
    pub title: String,
    /// 消息内容
    pub message: String,
    /// 通知级别
    pub level: NotificationLevel,
}

// ==================== Convenience Constructors ====================

impl NotificationPayload {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }
}

//! Order Model

use serde::{Deserialize, Serialize};

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    InPreparation,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Statuses rendered as kanban lanes (CANCELLED is list-only)
    pub const LANES: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::InPreparation,
        OrderStatus::Ready,
        OrderStatus::Completed,
    ];
}

/// 消费类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsumptionType {
    /// 堂食
    #[default]
    DineIn,
    /// 外卖/打包
    TakeAway,
    /// 配送
    Delivery,
}

/// Order item option selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItemOption {
    /// Option reference (String ID)
    pub option: String,
    pub name: String,
    /// Price delta in currency unit
    pub price: f64,
}

/// Selections for one option group of an order item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItemOptionGroup {
    /// Option group reference (String ID)
    pub group: String,
    pub group_name: String,
    pub selections: Vec<OrderItemOption>,
}

/// Order item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub id: String,
    /// Product reference (String ID)
    pub product: String,
    pub name: String,
    /// Unit price in currency unit
    pub price: f64,
    pub quantity: i32,
    /// Option selections, grouped per option group
    pub option_groups: Vec<OrderItemOptionGroup>,
    /// Kitchen readiness flag
    pub is_ready: bool,
    /// Line total in currency unit (server-computed)
    pub total: f64,
}

/// Order item group (course / send-batch; sequence order is significant
/// for kitchen display)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItemGroup {
    pub id: String,
    pub name: String,
    pub items: Vec<OrderItem>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    /// Business reference (String ID)
    pub business: String,
    pub status: OrderStatus,
    pub consumption_type: ConsumptionType,
    pub customer_name: String,
    pub is_paid: bool,
    /// Creation time, ISO-8601 string
    pub created_at: String,
    /// Total amount in currency unit
    pub total_amount: f64,
    pub item_groups: Vec<OrderItemGroup>,
}

impl Order {
    /// Apply a partial update in place. Absent fields are left untouched.
    pub fn apply_patch(&mut self, patch: &OrderPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(consumption_type) = patch.consumption_type {
            self.consumption_type = consumption_type;
        }
        if let Some(ref customer_name) = patch.customer_name {
            self.customer_name = customer_name.clone();
        }
        if let Some(is_paid) = patch.is_paid {
            self.is_paid = is_paid;
        }
        if let Some(total_amount) = patch.total_amount {
            self.total_amount = total_amount;
        }
        if let Some(ref item_groups) = patch.item_groups {
            self.item_groups = item_groups.clone();
        }
    }
}

/// Partial order update (push `order-updated` events and local edits)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumption_type: Option<ConsumptionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_paid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    /// Full replacement of the item group sequence (None = no change)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_groups: Option<Vec<OrderItemGroup>>,
}

impl OrderPatch {
    /// Status-only patch, the most common push update
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Paid-flag patch
    pub fn paid(is_paid: bool) -> Self {
        Self {
            is_paid: Some(is_paid),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        Order {
            id: "order-1".to_string(),
            business: "biz-1".to_string(),
            status: OrderStatus::Pending,
            consumption_type: ConsumptionType::DineIn,
            customer_name: "Ada".to_string(),
            is_paid: false,
            created_at: "2026-03-01T12:00:00Z".to_string(),
            total_amount: 18.5,
            item_groups: vec![],
        }
    }

    #[test]
    fn test_apply_patch_partial() {
        let mut order = order();
        order.apply_patch(&OrderPatch::status(OrderStatus::Ready));

        assert_eq!(order.status, OrderStatus::Ready);
        // untouched fields survive
        assert_eq!(order.customer_name, "Ada");
        assert!(!order.is_paid);
    }

    #[test]
    fn test_apply_patch_multiple_fields() {
        let mut order = order();
        let patch = OrderPatch {
            is_paid: Some(true),
            total_amount: Some(21.0),
            ..Default::default()
        };
        order.apply_patch(&patch);

        assert!(order.is_paid);
        assert_eq!(order.total_amount, 21.0);
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&OrderStatus::InPreparation).unwrap();
        assert_eq!(json, "\"IN_PREPARATION\"");

        let json = serde_json::to_string(&ConsumptionType::TakeAway).unwrap();
        assert_eq!(json, "\"TAKE_AWAY\"");
    }
}

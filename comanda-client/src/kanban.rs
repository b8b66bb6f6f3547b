//! Kanban Projection
//!
//! Read-side view grouping the store's orders into status lanes for
//! board rendering. Consumes store state, never owns or mutates it;
//! ordering is imposed here at read time, keeping the store itself
//! sort-free.

use crate::store::OrderStore;
use shared::models::{Order, OrderStatus};
use shared::query::SortDirection;

/// One status lane of the board
#[derive(Debug, Clone)]
pub struct KanbanLane {
    pub status: OrderStatus,
    pub orders: Vec<Order>,
}

impl KanbanLane {
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Total line items across the lane (lane header badge)
    pub fn item_count(&self) -> usize {
        self.orders
            .iter()
            .flat_map(|o| &o.item_groups)
            .map(|g| g.items.len())
            .sum()
    }

    /// Line items flagged ready by the kitchen
    pub fn ready_item_count(&self) -> usize {
        self.orders
            .iter()
            .flat_map(|o| &o.item_groups)
            .flat_map(|g| &g.items)
            .filter(|i| i.is_ready)
            .count()
    }
}

/// Board snapshot: one lane per active status, CANCELLED excluded
#[derive(Debug, Clone)]
pub struct KanbanBoard {
    pub lanes: Vec<KanbanLane>,
}

impl KanbanBoard {
    /// Project the store's current contents into lanes.
    ///
    /// Within a lane, orders sort by creation time in the store's
    /// configured direction. Timestamps are ISO-8601 strings, which
    /// order lexicographically.
    pub fn project(store: &OrderStore) -> Self {
        let sort = store.filters().sort;
        let lanes = OrderStatus::LANES
            .iter()
            .map(|&status| {
                let mut orders: Vec<Order> = store
                    .orders()
                    .iter()
                    .filter(|o| o.status == status)
                    .cloned()
                    .collect();
                orders.sort_by(|a, b| match sort {
                    SortDirection::Asc => a.created_at.cmp(&b.created_at),
                    SortDirection::Desc => b.created_at.cmp(&a.created_at),
                });
                KanbanLane { status, orders }
            })
            .collect();
        Self { lanes }
    }

    pub fn lane(&self, status: OrderStatus) -> Option<&KanbanLane> {
        self.lanes.iter().find(|l| l.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{ConsumptionType, OrderItem, OrderItemGroup};
    use shared::query::OrderFilters;

    fn order(id: &str, status: OrderStatus, created_at: &str) -> Order {
        Order {
            id: id.to_string(),
            business: "biz-1".to_string(),
            status,
            consumption_type: ConsumptionType::DineIn,
            customer_name: String::new(),
            is_paid: false,
            created_at: created_at.to_string(),
            total_amount: 0.0,
            item_groups: vec![],
        }
    }

    fn store_with(orders: Vec<Order>) -> OrderStore {
        let mut store = OrderStore::for_business("biz-1");
        for order in orders {
            store.upsert_one(order);
        }
        store
    }

    #[test]
    fn test_project_buckets_by_status() {
        let store = store_with(vec![
            order("a", OrderStatus::Pending, "2026-03-01T10:00:00Z"),
            order("b", OrderStatus::Ready, "2026-03-01T11:00:00Z"),
            order("c", OrderStatus::Pending, "2026-03-01T12:00:00Z"),
            order("d", OrderStatus::Cancelled, "2026-03-01T13:00:00Z"),
        ]);

        let board = KanbanBoard::project(&store);
        assert_eq!(board.lanes.len(), OrderStatus::LANES.len());
        assert_eq!(board.lane(OrderStatus::Pending).unwrap().order_count(), 2);
        assert_eq!(board.lane(OrderStatus::Ready).unwrap().order_count(), 1);
        // cancelled orders never reach the board
        assert!(board.lane(OrderStatus::Cancelled).is_none());
    }

    #[test]
    fn test_project_sorts_within_lane() {
        let mut store = store_with(vec![
            order("old", OrderStatus::Pending, "2026-03-01T10:00:00Z"),
            order("new", OrderStatus::Pending, "2026-03-01T12:00:00Z"),
        ]);

        // default direction: newest first
        let board = KanbanBoard::project(&store);
        let lane = board.lane(OrderStatus::Pending).unwrap();
        assert_eq!(lane.orders[0].id, "new");

        store.set_filters(OrderFilters {
            sort: SortDirection::Asc,
            ..Default::default()
        });
        let board = KanbanBoard::project(&store);
        let lane = board.lane(OrderStatus::Pending).unwrap();
        assert_eq!(lane.orders[0].id, "old");
    }

    #[test]
    fn test_lane_item_counts() {
        let mut pending = order("a", OrderStatus::Pending, "2026-03-01T10:00:00Z");
        pending.item_groups = vec![OrderItemGroup {
            id: "ig-1".to_string(),
            name: "First".to_string(),
            items: vec![
                OrderItem {
                    id: "i-1".to_string(),
                    product: "p-1".to_string(),
                    name: "Ramen".to_string(),
                    price: 10.0,
                    quantity: 1,
                    option_groups: vec![],
                    is_ready: true,
                    total: 10.0,
                },
                OrderItem {
                    id: "i-2".to_string(),
                    product: "p-2".to_string(),
                    name: "Gyoza".to_string(),
                    price: 5.0,
                    quantity: 1,
                    option_groups: vec![],
                    is_ready: false,
                    total: 5.0,
                },
            ],
        }];

        let store = store_with(vec![pending]);
        let board = KanbanBoard::project(&store);
        let lane = board.lane(OrderStatus::Pending).unwrap();
        assert_eq!(lane.item_count(), 2);
        assert_eq!(lane.ready_item_count(), 1);
    }
}

//! Order Collection Store
//!
//! Canonical in-memory collection of orders for the active business.
//! Repopulated wholesale by each successful fetch, incrementally patched
//! by push events and local edits, and wiped on business switch or
//! logout. The store itself never sorts; consumers impose ordering at
//! read time.
//!
//! Ordering between the three writers (fetch results, push events, local
//! edits) is governed entirely by arrival order: last write wins per
//! order id. Merge operations are idempotent so duplicate or out-of-order
//! channel delivery self-heals.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;

use shared::models::{Order, OrderPatch, OrderStatus};
use shared::query::{OrderFilters, OrderQuery, PaginatedResponse, Pagination};

/// Shared handle used by the channel manager and the fetch coordinator
pub type SharedOrderStore = Arc<RwLock<OrderStore>>;

/// Order collection state for one business
#[derive(Debug, Default)]
pub struct OrderStore {
    /// Active business (String ID); None before the first selection
    business: Option<String>,
    /// Unique by id; arrival order, not display order
    orders: Vec<Order>,
    pagination: Pagination,
    filters: OrderFilters,
    /// Weak detail-view pointer, resolved lazily by id
    active_order_id: Option<String>,
}

impl OrderStore {
    /// Create an empty store with no business selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store scoped to a business
    pub fn for_business(business: impl Into<String>) -> Self {
        Self {
            business: Some(business.into()),
            ..Self::default()
        }
    }

    /// Wrap in the shared handle used by the async collaborators
    pub fn into_shared(self) -> SharedOrderStore {
        Arc::new(RwLock::new(self))
    }

    // ==================== Read side ====================

    pub fn business(&self) -> Option<&str> {
        self.business.as_deref()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn filters(&self) -> &OrderFilters {
        &self.filters
    }

    pub fn get(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == order_id)
    }

    /// Resolve the active-order pointer. None if nothing is selected or
    /// the selected order has since been removed.
    pub fn active_order(&self) -> Option<&Order> {
        self.active_order_id
            .as_deref()
            .and_then(|order_id| self.get(order_id))
    }

    pub fn set_active_order(&mut self, order_id: Option<String>) {
        self.active_order_id = order_id;
    }

    /// Fetch request for the current filter/pagination state
    pub fn query(&self) -> OrderQuery {
        OrderQuery::from_state(&self.filters, &self.pagination)
    }

    // ==================== Merge operations ====================

    /// Wholesale replace from a fetch response.
    ///
    /// The only operation allowed to change `total`/`total_pages`.
    pub fn replace_all(&mut self, response: PaginatedResponse<Order>) {
        self.pagination = Pagination {
            page: response.page,
            limit: response.limit,
            total: response.total,
            total_pages: response.total_pages,
        };
        self.orders = response.data;
        tracing::debug!(
            count = self.orders.len(),
            total = self.pagination.total,
            "Order collection replaced from fetch"
        );
    }

    /// Insert or overwrite the order with matching id.
    ///
    /// Pagination counters are left untouched; they stay stale until the
    /// next fetch.
    pub fn upsert_one(&mut self, order: Order) {
        if let Some(business) = &self.business {
            if order.business != *business {
                tracing::debug!(order_id = %order.id, "Dropping order for another business");
                return;
            }
        }
        match self.orders.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => *existing = order,
            None => self.orders.push(order),
        }
    }

    /// Patch the order with matching id in place. No-op when absent —
    /// "already gone" is a normal outcome under racing pushes.
    pub fn apply_patch(&mut self, order_id: &str, patch: &OrderPatch) -> bool {
        match self.orders.iter_mut().find(|o| o.id == order_id) {
            Some(order) => {
                order.apply_patch(patch);
                true
            }
            None => {
                tracing::debug!(order_id, "Patch target not in store, ignoring");
                false
            }
        }
    }

    /// Per-lane reconciliation: replace every held order of `status` with
    /// the authoritative batch, then dedupe by id keeping the last
    /// occurrence. Idempotent for a fixed batch.
    pub fn upsert_by_status(&mut self, orders: Vec<Order>, status: OrderStatus) {
        self.orders.retain(|o| o.status != status);
        if let Some(business) = &self.business {
            self.orders
                .extend(orders.into_iter().filter(|o| o.business == *business));
        } else {
            self.orders.extend(orders);
        }

        // Dedupe by id, last occurrence wins
        let mut seen = HashSet::new();
        let mut kept: Vec<Order> = Vec::with_capacity(self.orders.len());
        for order in self.orders.drain(..).rev() {
            if seen.insert(order.id.clone()) {
                kept.push(order);
            }
        }
        kept.reverse();
        self.orders = kept;
    }

    /// Remove the order with matching id. No-op when absent.
    pub fn remove(&mut self, order_id: &str) -> bool {
        let before = self.orders.len();
        self.orders.retain(|o| o.id != order_id);
        before != self.orders.len()
    }

    // ==================== Filter / pagination transitions ====================

    /// Replace the active filters. Resets page to 1: a filter change
    /// invalidates the current page's meaning.
    pub fn set_filters(&mut self, filters: OrderFilters) {
        self.filters = filters;
        self.pagination.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.pagination.page = page.max(1);
    }

    /// Change the page size; resets page to 1.
    pub fn set_limit(&mut self, limit: u32) {
        self.pagination.limit = limit.max(1);
        self.pagination.page = 1;
    }

    /// Restore default filters and pagination in one atomic update
    pub fn reset_filters(&mut self) {
        self.filters = OrderFilters::default();
        self.pagination = Pagination::default();
    }

    // ==================== Lifecycle ====================

    /// Select a business. A different business wipes the collection; the
    /// new store starts empty and is repopulated from fetch + channel.
    pub fn switch_business(&mut self, business: impl Into<String>) {
        let business = business.into();
        if self.business.as_deref() == Some(business.as_str()) {
            return;
        }
        tracing::debug!(%business, "Switching business, clearing order collection");
        self.reset();
        self.business = Some(business);
    }

    /// Reset to empty (logout / teardown). Business selection is cleared
    /// too.
    pub fn reset(&mut self) {
        self.business = None;
        self.orders.clear();
        self.pagination = Pagination::default();
        self.filters = OrderFilters::default();
        self.active_order_id = None;
    }
}

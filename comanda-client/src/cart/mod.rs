//! Cart Composer
//!
//! Turns catalog selections into priced cart items and groups ready for
//! submission. Everything here is ephemeral and client-only: item and
//! group ids are locally generated and distinct from any backend
//! order-item id until the cart is submitted.

pub mod mapper;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};
use shared::models::CatalogSnapshot;

/// Selected option on a cart item (denormalized for display)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedOption {
    /// Option group reference (String ID)
    pub group: String,
    /// Option reference (String ID)
    pub option: String,
    pub name: String,
    /// Price delta in currency unit
    pub price: f64,
}

/// Cart item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Local id (UUID), never a server id
    pub id: String,
    /// Product reference (String ID)
    pub product: String,
    pub name: String,
    /// Unit price in currency unit
    pub unit_price: f64,
    pub quantity: i32,
    pub selected_options: Vec<SelectedOption>,
    /// `(unit_price + Σ option deltas) × quantity`, recomputed on every
    /// mutation — never stored stale
    pub total_price: f64,
}

impl CartItem {
    fn recompute(&mut self) {
        let options: f64 = self.selected_options.iter().map(|o| o.price).sum();
        self.total_price = (self.unit_price + options) * f64::from(self.quantity);
    }
}

/// Named cart group (course / send-batch); sequence order is significant
/// for kitchen display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartGroup {
    /// Local id (UUID)
    pub id: String,
    pub name: String,
    pub items: Vec<CartItem>,
}

impl CartGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn total_price(&self) -> f64 {
        self.items.iter().map(|i| i.total_price).sum()
    }
}

/// In-memory cart: an ordered sequence of groups
#[derive(Debug, Clone, Default)]
pub struct Cart {
    groups: Vec<CartGroup>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[CartGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.items.is_empty())
    }

    pub fn total_amount(&self) -> f64 {
        self.groups.iter().map(|g| g.total_price()).sum()
    }

    /// Append an empty group; returns its local id
    pub fn add_group(&mut self, name: impl Into<String>) -> String {
        let group = CartGroup::new(name);
        let group_id = group.id.clone();
        self.groups.push(group);
        group_id
    }

    /// Compose a priced item from a catalog selection and append it to a
    /// group.
    ///
    /// Validates that the quantity is at least 1, the product exists and
    /// is available, every selected option belongs to a group attached to
    /// the product, and the per-group selection cardinality holds.
    /// Returns the new item's local id.
    pub fn add_item(
        &mut self,
        catalog: &CatalogSnapshot,
        group_id: &str,
        product_id: &str,
        quantity: i32,
        option_ids: &[&str],
    ) -> ClientResult<String> {
        if quantity < 1 {
            return Err(ClientError::InvalidSelection(format!(
                "quantity must be at least 1, got {quantity}"
            )));
        }

        let product = catalog
            .product(product_id)
            .filter(|p| p.is_available)
            .ok_or_else(|| {
                ClientError::InvalidSelection(format!("product {product_id} is not available"))
            })?;

        let mut selected_options = Vec::with_capacity(option_ids.len());
        let mut per_group: HashMap<&str, u32> = HashMap::new();
        for &option_id in option_ids {
            let (group, option) = catalog.resolve_option(product, option_id).ok_or_else(|| {
                ClientError::InvalidSelection(format!(
                    "option {option_id} does not belong to product {product_id}"
                ))
            })?;

            let count = per_group.entry(group.id.as_str()).or_default();
            *count += 1;
            let limit = if group.is_multi_select {
                group.max_selections.map(|m| m.max(0) as u32)
            } else {
                Some(1)
            };
            if let Some(limit) = limit {
                if *count > limit {
                    return Err(ClientError::InvalidSelection(format!(
                        "group {} allows at most {} selection(s)",
                        group.name, limit
                    )));
                }
            }

            selected_options.push(SelectedOption {
                group: group.id.clone(),
                option: option.id.clone(),
                name: option.name.clone(),
                price: option.price,
            });
        }

        let group = self
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| ClientError::NotFound(format!("cart group {group_id}")))?;

        let mut item = CartItem {
            id: Uuid::new_v4().to_string(),
            product: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
            selected_options,
            total_price: 0.0,
        };
        item.recompute();

        let item_id = item.id.clone();
        group.items.push(item);
        Ok(item_id)
    }

    /// Change an item's quantity. A quantity of 0 or less removes the
    /// item; an unknown item is a silent no-op (concurrent UI actions can
    /// race).
    pub fn update_quantity(&mut self, group_id: &str, item_id: &str, quantity: i32) {
        let Some(group) = self.groups.iter_mut().find(|g| g.id == group_id) else {
            return;
        };

        if quantity <= 0 {
            group.items.retain(|i| i.id != item_id);
            return;
        }

        if let Some(item) = group.items.iter_mut().find(|i| i.id == item_id) {
            item.quantity = quantity;
            item.recompute();
        }
    }

    /// Idempotent removal; removing a non-existent item is a silent no-op
    pub fn remove_item(&mut self, group_id: &str, item_id: &str) {
        if let Some(group) = self.groups.iter_mut().find(|g| g.id == group_id) {
            group.items.retain(|i| i.id != item_id);
        }
    }

    /// Drop everything (post-submit or business switch)
    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Consume the cart into its group sequence for submission
    pub fn into_groups(self) -> Vec<CartGroup> {
        self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OptionGroup, Product, ProductOption};

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot {
            business: "biz-1".to_string(),
            products: vec![
                Product {
                    id: "prod-1".to_string(),
                    business: "biz-1".to_string(),
                    name: "Ramen".to_string(),
                    price: 10.0,
                    is_available: true,
                    option_groups: vec!["grp-size".to_string(), "grp-extra".to_string()],
                },
                Product {
                    id: "prod-off".to_string(),
                    business: "biz-1".to_string(),
                    name: "Seasonal".to_string(),
                    price: 12.0,
                    is_available: false,
                    option_groups: vec![],
                },
            ],
            option_groups: vec![
                OptionGroup {
                    id: "grp-size".to_string(),
                    name: "Size".to_string(),
                    is_multi_select: false,
                    max_selections: None,
                    options: vec![
                        ProductOption {
                            id: "opt-large".to_string(),
                            name: "Large".to_string(),
                            price: 3.0,
                            is_available: true,
                        },
                        ProductOption {
                            id: "opt-small".to_string(),
                            name: "Small".to_string(),
                            price: -1.0,
                            is_available: true,
                        },
                    ],
                },
                OptionGroup {
                    id: "grp-extra".to_string(),
                    name: "Extras".to_string(),
                    is_multi_select: true,
                    max_selections: Some(2),
                    options: vec![
                        ProductOption {
                            id: "opt-egg".to_string(),
                            name: "Egg".to_string(),
                            price: 1.5,
                            is_available: true,
                        },
                        ProductOption {
                            id: "opt-nori".to_string(),
                            name: "Nori".to_string(),
                            price: 1.0,
                            is_available: true,
                        },
                        ProductOption {
                            id: "opt-chashu".to_string(),
                            name: "Chashu".to_string(),
                            price: 2.5,
                            is_available: true,
                        },
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_add_item_computes_total_price() {
        let catalog = catalog();
        let mut cart = Cart::new();
        let group_id = cart.add_group("First course");

        // quantity 2, one +3 option on a 10 product => 26
        cart.add_item(&catalog, &group_id, "prod-1", 2, &["opt-large"])
            .unwrap();

        let item = &cart.groups()[0].items[0];
        assert_eq!(item.total_price, 26.0);
        assert_eq!(cart.total_amount(), 26.0);
    }

    #[test]
    fn test_add_item_rejects_zero_quantity() {
        let catalog = catalog();
        let mut cart = Cart::new();
        let group_id = cart.add_group("First course");

        let err = cart
            .add_item(&catalog, &group_id, "prod-1", 0, &[])
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidSelection(_)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_item_rejects_unavailable_product() {
        let catalog = catalog();
        let mut cart = Cart::new();
        let group_id = cart.add_group("First course");

        let err = cart
            .add_item(&catalog, &group_id, "prod-off", 1, &[])
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidSelection(_)));
    }

    #[test]
    fn test_add_item_rejects_foreign_option() {
        let catalog = catalog();
        let mut cart = Cart::new();
        let group_id = cart.add_group("First course");

        // opt-ghost is nowhere in the catalog
        let err = cart
            .add_item(&catalog, &group_id, "prod-1", 1, &["opt-ghost"])
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidSelection(_)));
    }

    #[test]
    fn test_add_item_enforces_single_select_cardinality() {
        let catalog = catalog();
        let mut cart = Cart::new();
        let group_id = cart.add_group("First course");

        let err = cart
            .add_item(&catalog, &group_id, "prod-1", 1, &["opt-large", "opt-small"])
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidSelection(_)));
    }

    #[test]
    fn test_add_item_enforces_max_selections() {
        let catalog = catalog();
        let mut cart = Cart::new();
        let group_id = cart.add_group("First course");

        // grp-extra allows two
        cart.add_item(&catalog, &group_id, "prod-1", 1, &["opt-egg", "opt-nori"])
            .unwrap();

        let err = cart
            .add_item(
                &catalog,
                &group_id,
                "prod-1",
                1,
                &["opt-egg", "opt-nori", "opt-chashu"],
            )
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidSelection(_)));
    }

    #[test]
    fn test_update_quantity_recomputes_price() {
        let catalog = catalog();
        let mut cart = Cart::new();
        let group_id = cart.add_group("First course");
        let item_id = cart
            .add_item(&catalog, &group_id, "prod-1", 2, &["opt-large"])
            .unwrap();

        cart.update_quantity(&group_id, &item_id, 3);
        assert_eq!(cart.groups()[0].items[0].total_price, 39.0);
    }

    #[test]
    fn test_update_quantity_zero_removes_item() {
        let catalog = catalog();
        let mut cart = Cart::new();
        let group_id = cart.add_group("First course");
        let item_id = cart
            .add_item(&catalog, &group_id, "prod-1", 2, &[])
            .unwrap();

        cart.update_quantity(&group_id, &item_id, 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_item_is_idempotent() {
        let catalog = catalog();
        let mut cart = Cart::new();
        let group_id = cart.add_group("First course");
        let item_id = cart
            .add_item(&catalog, &group_id, "prod-1", 1, &[])
            .unwrap();

        cart.remove_item(&group_id, &item_id);
        cart.remove_item(&group_id, &item_id);
        cart.remove_item(&group_id, "ghost");
        assert!(cart.is_empty());
    }
}

//! Order → cart mapping (re-editing an existing order)
//!
//! Projects a backend order's item groups into cart shape. Prices are
//! carried verbatim from the order — the order is historical and catalog
//! prices may have changed since — and ids are freshly generated local
//! ones, never the server's.

use uuid::Uuid;

use super::{CartGroup, CartItem, SelectedOption};
use shared::models::Order;

/// Map an order into an editable cart group sequence.
///
/// Each order item's per-option-group selections are flattened into a
/// single selected-option list (group order is not preserved, only the
/// flat union). An order with no item groups maps to an empty sequence.
pub fn map_order_to_cart(order: &Order) -> Vec<CartGroup> {
    order
        .item_groups
        .iter()
        .map(|item_group| CartGroup {
            id: Uuid::new_v4().to_string(),
            name: item_group.name.clone(),
            items: item_group
                .items
                .iter()
                .map(|item| {
                    let selected_options: Vec<SelectedOption> = item
                        .option_groups
                        .iter()
                        .flat_map(|group| {
                            group.selections.iter().map(|selection| SelectedOption {
                                group: group.group.clone(),
                                option: selection.option.clone(),
                                name: selection.name.clone(),
                                price: selection.price,
                            })
                        })
                        .collect();

                    CartItem {
                        id: Uuid::new_v4().to_string(),
                        product: item.product.clone(),
                        name: item.name.clone(),
                        unit_price: item.price,
                        quantity: item.quantity,
                        selected_options,
                        // stored total, not recomputed from catalog
                        total_price: item.total,
                    }
                })
                .collect(),
        })
        .collect()
}

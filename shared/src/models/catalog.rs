//! Catalog Model
//!
//! Immutable-per-fetch snapshot of a business's products, option groups
//! and options. The cart composer validates selections against it; the
//! snapshot itself carries no selection logic.

use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    /// Business reference (String ID)
    pub business: String,
    pub name: String,
    /// Price in currency unit
    pub price: f64,
    pub is_available: bool,
    /// Attached option group references (String IDs)
    pub option_groups: Vec<String>,
}

/// Product option (embedded in OptionGroup)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductOption {
    pub id: String,
    pub name: String,
    /// Price delta in currency unit (positive=add, negative=subtract)
    pub price: f64,
    pub is_available: bool,
}

/// Option group entity
///
/// Owns an ordered set of options. Selection cardinality fields are data
/// only; enforcement lives in the cart composer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionGroup {
    pub id: String,
    pub name: String,
    pub is_multi_select: bool,
    /// Max selections for multi-select groups (None = unlimited)
    pub max_selections: Option<i32>,
    /// Embedded options, display order
    pub options: Vec<ProductOption>,
}

impl OptionGroup {
    /// Look up an option of this group by id
    pub fn option(&self, option_id: &str) -> Option<&ProductOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// Catalog snapshot for one business
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Business reference (String ID)
    pub business: String,
    pub products: Vec<Product>,
    pub option_groups: Vec<OptionGroup>,
}

impl CatalogSnapshot {
    /// Look up a product by id
    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    /// Look up an option group by id
    pub fn option_group(&self, group_id: &str) -> Option<&OptionGroup> {
        self.option_groups.iter().find(|g| g.id == group_id)
    }

    /// Option groups attached to a product, in the product's declared order
    pub fn groups_for<'a>(&'a self, product: &'a Product) -> impl Iterator<Item = &'a OptionGroup> {
        product
            .option_groups
            .iter()
            .filter_map(|group_id| self.option_group(group_id))
    }

    /// Resolve an option id against the groups attached to a product.
    ///
    /// Returns the owning group and the option, or None when the option
    /// does not belong to any group attached to the product.
    pub fn resolve_option<'a>(
        &'a self,
        product: &'a Product,
        option_id: &str,
    ) -> Option<(&'a OptionGroup, &'a ProductOption)> {
        self.groups_for(product)
            .find_map(|group| group.option(option_id).map(|option| (group, option)))
    }
}

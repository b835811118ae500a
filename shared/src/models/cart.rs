//! Shopping cart line items

use serde::{Deserialize, Serialize};

/// A single line in the cart
///
/// Two lines are the same line when product, size and color all match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Catalogue identifier of the product
    #[serde(alias = "id")]
    pub product_id: String,

    /// Display name at the time it was added
    pub name: String,

    /// Unit price in dollars
    pub price: f64,

    /// Number of units, always at least 1 while in the cart
    pub quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<String>,
}

impl CartItem {
    pub fn new<I: Into<String>, N: Into<String>>(
        product_id: I,
        name: N,
        price: f64,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            price,
            quantity,
            selected_size: None,
            selected_color: None,
        }
    }

    pub fn with_size<S: Into<String>>(mut self, size: S) -> Self {
        self.selected_size = Some(size.into());
        self
    }

    pub fn with_color<S: Into<String>>(mut self, color: S) -> Self {
        self.selected_color = Some(color.into());
        self
    }

    /// Whether the given product, size and color identify this line
    pub fn same_line(&self, product_id: &str, size: Option<&str>, color: Option<&str>) -> bool {
        self.product_id == product_id
            && self.selected_size.as_deref() == size
            && self.selected_color.as_deref() == color
    }

    /// Price of this line (unit price times quantity)
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

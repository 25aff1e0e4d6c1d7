use chrono::{DateTime, Utc};
use poem_openapi::Object;

use business::domain::product::model::Product;

#[derive(Debug, Clone, Object)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    /// Current catalog price, e.g. "12.99"
    pub unit_price: String,
    pub available_quantity: u32,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            in_stock: product.is_in_stock(),
            id: product.id.to_string(),
            name: product.name,
            unit_price: product.unit_price.to_string(),
            available_quantity: product.available_quantity,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

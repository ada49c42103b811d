use serde::{Deserialize, Serialize};

/// Catalog entry as stored in the data file. Field order matches the
/// on-disk JSON objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub stock: i64,
}

impl Product {
    pub fn from_new(id: u64, new: NewProduct) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            price: new.price,
            stock: new.stock,
        }
    }

    /// Overwrites every field except `id`.
    pub fn apply(&mut self, new: NewProduct) {
        self.name = new.name;
        self.description = new.description;
        self.price = new.price;
        self.stock = new.stock;
    }
}

// ── Request payloads ─────────────────────────────────────────────────────────

/// Body of `POST /products` and `PUT /products/{id}`. The id is always
/// assigned by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub stock: i64,
}

impl NewProduct {
    /// Rejects payloads the frontend form would never send.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("price must be a number >= 0".to_string());
        }
        if self.stock < 0 {
            return Err("stock must be >= 0".to_string());
        }
        Ok(())
    }
}

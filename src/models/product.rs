use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Finished-goods catalog entry. Reference data consulted by reports so
/// impact lists can carry product names instead of bare ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub active: bool,
}

impl Product {
    pub fn new(name: impl Into<String>, sku: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            sku: sku.into(),
            active: true,
        }
    }
}

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Unit of measure for received and consumed quantities.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
pub enum Unit {
    #[serde(rename = "kg")]
    #[strum(serialize = "kg")]
    Kg,
    #[serde(rename = "g")]
    #[strum(serialize = "g")]
    G,
    #[serde(rename = "L")]
    #[strum(serialize = "L")]
    L,
    #[serde(rename = "ml")]
    #[strum(serialize = "ml")]
    Ml,
    #[serde(rename = "pcs")]
    #[strum(serialize = "pcs")]
    Pcs,
    #[serde(rename = "bag")]
    #[strum(serialize = "bag")]
    Bag,
    #[serde(rename = "box")]
    #[strum(serialize = "box")]
    Box,
}

/// Required storage condition for an ingredient.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
pub enum StorageCondition {
    Ambient,
    Chilled,
    Frozen,
}

/// A category of raw ingredient (e.g. "Strong White Flour").
///
/// Immutable reference data: created and retired by configuration, never by
/// production activity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngredientType {
    pub id: Uuid,
    pub name: String,
    pub default_unit: Unit,
    pub storage: StorageCondition,
    pub active: bool,
}

impl IngredientType {
    pub fn new(name: impl Into<String>, default_unit: Unit, storage: StorageCondition) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            default_unit,
            storage,
            active: true,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Discriminates the two kinds of production intermediate.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum BatchKind {
    Dough,
    Filling,
}

/// A production intermediate (dough or filling) made from one or more
/// ingredient lots. The consumed-lot set lives in
/// [`BatchIngredientLink`](super::links::BatchIngredientLink) rows and is
/// non-empty at creation.
///
/// `code` is a human batch code (e.g. "DOUGH-101") and is not guaranteed
/// unique.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntermediateBatch {
    pub id: Uuid,
    pub code: String,
    pub kind: BatchKind,
    /// Recipe name, e.g. "White Sourdough".
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
}

impl IntermediateBatch {
    pub fn new(
        code: impl Into<String>,
        kind: BatchKind,
        name: impl Into<String>,
        created_by: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: code.into(),
            kind,
            name: name.into(),
            created_at: Utc::now(),
            created_by,
        }
    }
}

//! Catalog product record.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as supplied by the catalog source.
///
/// Read-only to the rest of the system: products are decoded once at the
/// catalog boundary and then only cloned and filtered. Decoding rejects
/// records with a missing or empty identifier, a missing name or a negative
/// price; a missing description decodes as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Brand or manufacturer.
    #[serde(default)]
    pub brand: String,
    /// Unit price.
    pub price: Price,
    /// Free-text description, mined for scent suggestions.
    #[serde(default)]
    pub description: String,
    /// Image reference, handed through unmodified to export collaborators.
    #[serde(default, alias = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

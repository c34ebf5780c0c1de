use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Model, ValidationError};

/// One sellable size of a color variation.
///
/// Quantity is kept signed: every movement path floors it at zero, but
/// reversing a ledger entry against already-diverged state is allowed to
/// undershoot rather than lose the reversal (see the engine docs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeVariation {
    pub id: String,
    pub size: String,
    pub quantity: i64,
}

impl SizeVariation {
    pub fn new(size: impl Into<String>, quantity: i64) -> Self {
        SizeVariation {
            id: Uuid::new_v4().to_string(),
            size: size.into(),
            quantity,
        }
    }
}

/// A color variation grouping the sizes it is offered in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorVariation {
    pub id: String,
    pub color: String,
    pub sizes: Vec<SizeVariation>,
}

impl ColorVariation {
    pub fn new(color: impl Into<String>, sizes: Vec<SizeVariation>) -> Self {
        ColorVariation {
            id: Uuid::new_v4().to_string(),
            color: color.into(),
            sizes,
        }
    }
}

/// A product with its color/size variations.
///
/// Variation order is insertion order and only matters for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub variations: Vec<ColorVariation>,
}

impl Model for Product {
    const COLLECTION: &'static str = "products";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Product {
    pub fn new(name: impl Into<String>, variations: Vec<ColorVariation>) -> Self {
        Product {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            variations,
        }
    }

    /// Apply the save-boundary rules and return the product that may be
    /// written, consuming `self`.
    ///
    /// Color variations with an empty label are discarded, sizes with an
    /// empty label are discarded, and a color variation left with zero
    /// sizes is discarded entirely. The save is refused if the name is
    /// empty, nothing survives filtering, or surviving labels collide.
    pub fn sanitized(mut self) -> Result<Product, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }

        self.variations.retain(|v| !v.color.trim().is_empty());
        for variation in &mut self.variations {
            variation.sizes.retain(|s| !s.size.trim().is_empty());
        }
        self.variations.retain(|v| !v.sizes.is_empty());

        if self.variations.is_empty() {
            return Err(ValidationError::NoVariations);
        }

        for (i, variation) in self.variations.iter().enumerate() {
            if self.variations[..i].iter().any(|v| v.color == variation.color) {
                return Err(ValidationError::DuplicateColor(variation.color.clone()));
            }
            for (j, size) in variation.sizes.iter().enumerate() {
                if variation.sizes[..j].iter().any(|s| s.size == size.size) {
                    return Err(ValidationError::DuplicateSize {
                        color: variation.color.clone(),
                        size: size.size.clone(),
                    });
                }
            }
        }

        Ok(self)
    }

    /// Find a variation by its stable id.
    pub fn variation(&self, variation_id: &str) -> Option<&ColorVariation> {
        self.variations.iter().find(|v| v.id == variation_id)
    }

    /// Find a size by stable variation and size ids.
    pub fn size(&self, variation_id: &str, size_id: &str) -> Option<&SizeVariation> {
        self.variation(variation_id)
            .and_then(|v| v.sizes.iter().find(|s| s.id == size_id))
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::{CatalogError, ProductId};

/// Message for every rejected creation input.
pub const ALL_FIELDS_REQUIRED: &str = "All fields are required";

/// A persisted catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unvalidated creation input, as decoded from a request body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CandidateProduct {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A creation input that passed validation. Only this shape reaches a store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub image: String,
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Non-empty text counts as present.
pub fn is_truthy_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

/// A price counts as present unless it is missing, zero or NaN.
pub fn is_truthy_price(value: Option<f64>) -> bool {
    value.is_some_and(|p| p != 0.0 && !p.is_nan())
}

impl TryFrom<CandidateProduct> for NewProduct {
    type Error = CatalogError;

    fn try_from(candidate: CandidateProduct) -> Result<Self, Self::Error> {
        if !is_truthy_text(&candidate.name)
            || !is_truthy_price(candidate.price)
            || !is_truthy_text(&candidate.image)
        {
            return Err(CatalogError::invalid_input(ALL_FIELDS_REQUIRED));
        }

        match candidate {
            CandidateProduct {
                name: Some(name),
                price: Some(price),
                image: Some(image),
            } => Ok(NewProduct { name, price, image }),
            _ => Err(CatalogError::invalid_input(ALL_FIELDS_REQUIRED)),
        }
    }
}

impl NewProduct {
    /// Materialize the record a store persists under `id`.
    pub fn into_product(self, id: ProductId, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            image: self.image,
            created_at: now,
            updated_at: now,
        }
    }
}

impl ProductPatch {
    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.image.is_none()
    }

    /// Overwrite the supplied fields of `product` and bump `updated_at`.
    pub fn apply_to(&self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(image) = &self.image {
            product.image = image.clone();
        }
        product.updated_at = now;
    }
}

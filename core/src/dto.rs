//! Wire DTOs for the catalog API.
//!
//! # Design
//! Bodies are serialized camelCase. For decoding, the codec lowercases every
//! property name first, so each multi-word field carries an all-lowercase
//! deserialize name; that is what makes property matching case-insensitive.
//! Missing fields take their defaults; the mapper builds entities from them
//! as-is.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"), default)]
pub struct CatalogItemDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(rename(deserialize = "pictureuri"))]
    pub picture_uri: Option<String>,
    #[serde(rename(deserialize = "catalogtypeid"))]
    pub catalog_type_id: i32,
    #[serde(rename(deserialize = "catalogbrandid"))]
    pub catalog_brand_id: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogBrandDto {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogTypeDto {
    pub id: i32,
    pub name: String,
}

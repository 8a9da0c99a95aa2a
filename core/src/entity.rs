//! Catalog aggregates and the capability contract the adapter is generic over.

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::dto::{CatalogBrandDto, CatalogItemDto, CatalogTypeDto};
use crate::registry::EntityKind;

/// An aggregate stored behind the remote catalog API.
///
/// `KIND` selects the route and envelope pair once, when a repository is
/// built. `Dto` is the wire shape exchanged with the server.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Display + Send + Sync;
    type Dto: Serialize + DeserializeOwned + Send;

    const KIND: EntityKind;

    /// Server-assigned identifier; `0` until the entity has been created.
    fn id(&self) -> Self::Id;
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub picture_uri: String,
    pub catalog_type_id: i32,
    pub catalog_brand_id: i32,
}

impl CatalogItem {
    /// A not-yet-persisted item.
    pub fn new(
        catalog_type_id: i32,
        catalog_brand_id: i32,
        description: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        picture_uri: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: description.into(),
            price,
            picture_uri: picture_uri.into(),
            catalog_type_id,
            catalog_brand_id,
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }
}

impl Entity for CatalogItem {
    type Id = i32;
    type Dto = CatalogItemDto;

    const KIND: EntityKind = EntityKind::CatalogItem;

    fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogBrand {
    pub id: i32,
    pub brand: String,
}

impl CatalogBrand {
    pub fn new(brand: impl Into<String>) -> Self {
        Self {
            id: 0,
            brand: brand.into(),
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }
}

impl Entity for CatalogBrand {
    type Id = i32;
    type Dto = CatalogBrandDto;

    const KIND: EntityKind = EntityKind::CatalogBrand;

    fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogType {
    pub id: i32,
    pub kind: String,
}

impl CatalogType {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            id: 0,
            kind: kind.into(),
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }
}

impl Entity for CatalogType {
    type Id = i32;
    type Dto = CatalogTypeDto;

    const KIND: EntityKind = EntityKind::CatalogType;

    fn id(&self) -> i32 {
        self.id
    }
}

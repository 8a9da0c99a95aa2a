//! Entity kinds and their wire registrations.
//!
//! # Invariants
//! - A kind is usable only when it has both a route and an envelope pair.
//! - Routes are one-to-one with kinds and never overridden per call.
//!
//! The set of kinds is closed at compile time; the tables decide which of
//! them a given repository configuration actually wires.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RepositoryError;

/// Tag identifying which aggregate an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    CatalogItem,
    CatalogBrand,
    CatalogType,
}

impl EntityKind {
    pub const ALL: [Self; 3] = [Self::CatalogItem, Self::CatalogBrand, Self::CatalogType];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CatalogItem => "catalog-item",
            Self::CatalogBrand => "catalog-brand",
            Self::CatalogType => "catalog-type",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity kind → resource path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTable(BTreeMap<EntityKind, String>);

impl RouteTable {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, kind: EntityKind, route: impl Into<String>) -> Self {
        self.0.insert(kind, route.into());
        self
    }

    pub fn resolve(&self, kind: EntityKind) -> Result<&str, RepositoryError> {
        self.0
            .get(&kind)
            .map(String::as_str)
            .ok_or(RepositoryError::UnsupportedType {
                kind,
                missing: "route",
            })
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::empty()
            .with(EntityKind::CatalogItem, "catalog-items")
            .with(EntityKind::CatalogBrand, "catalog-brands")
            .with(EntityKind::CatalogType, "catalog-types")
    }
}

/// Property names wrapping one entity and a collection of entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeKeys {
    pub single: String,
    pub list: String,
}

impl EnvelopeKeys {
    pub fn new(single: impl Into<String>, list: impl Into<String>) -> Self {
        Self {
            single: single.into(),
            list: list.into(),
        }
    }
}

/// Entity kind → envelope pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvelopeTable(BTreeMap<EntityKind, EnvelopeKeys>);

impl EnvelopeTable {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, kind: EntityKind, keys: EnvelopeKeys) -> Self {
        self.0.insert(kind, keys);
        self
    }

    pub fn resolve(&self, kind: EntityKind) -> Result<&EnvelopeKeys, RepositoryError> {
        self.0.get(&kind).ok_or(RepositoryError::UnsupportedType {
            kind,
            missing: "envelope",
        })
    }
}

impl Default for EnvelopeTable {
    fn default() -> Self {
        Self::empty()
            .with(
                EntityKind::CatalogItem,
                EnvelopeKeys::new("catalogItem", "catalogItems"),
            )
            .with(
                EntityKind::CatalogBrand,
                EnvelopeKeys::new("catalogBrand", "catalogBrands"),
            )
            .with(
                EntityKind::CatalogType,
                EnvelopeKeys::new("catalogType", "catalogTypes"),
            )
    }
}

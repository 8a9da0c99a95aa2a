//! Remote repository adapter for the catalog REST API.
//!
//! # Overview
//! Gives each catalog aggregate (items, brands, types) a uniform CRUD and
//! query surface while storage lives behind an HTTP API. Responses arrive in
//! kind-specific JSON envelopes; queries are answered by fetching the whole
//! collection and evaluating a `Specification` in memory.
//!
//! # Design
//! - `registry` maps each `EntityKind` to its route and envelope pair;
//!   `HttpRepository::new` resolves both once.
//! - `codec` unwraps envelopes and builds entities through a `Mapper`.
//! - `evaluator` runs filter → stable sort → skip/take → projection.
//! - `client` builds requests as plain data, a `Transport` executes them.
//! - Single reads degrade to `None`; collection reads and writes fail loudly.

pub mod client;
pub mod codec;
pub mod config;
pub mod dto;
pub mod entity;
pub mod error;
pub mod evaluator;
pub mod http;
pub mod mapping;
pub mod registry;
pub mod repository;
pub mod specification;
pub mod transport;

pub use client::ResourceClient;
pub use codec::EnvelopeCodec;
pub use config::RepositoryConfig;
pub use entity::{CatalogBrand, CatalogItem, CatalogType, Entity};
pub use error::{CodecError, MappingError, RepositoryError, RepositoryResult, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use mapping::{CatalogMappings, Mapper};
pub use registry::{EntityKind, EnvelopeKeys, EnvelopeTable, RouteTable};
pub use repository::{
    CatalogBrandRepository, CatalogItemRepository, CatalogTypeRepository, HttpRepository,
};
pub use specification::{Direction, Projection, Query, Specification};
pub use transport::{ReqwestTransport, Transport};

pub use tokio_util::sync::CancellationToken;

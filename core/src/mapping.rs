//! DTO ↔ entity construction rules.
//!
//! The mapper is an ordinary value handed to the repository; there is no
//! process-wide registration. `to_entity` either yields a complete entity or
//! a `MappingError`. `CatalogMappings` never fails: it builds entities from
//! whatever the DTO carries, blanks and defaults included.

use crate::dto::{CatalogBrandDto, CatalogItemDto, CatalogTypeDto};
use crate::entity::{CatalogBrand, CatalogItem, CatalogType, Entity};
use crate::error::MappingError;

/// Construction rules for one entity type.
pub trait Mapper<E: Entity>: Send + Sync {
    fn to_entity(&self, dto: E::Dto) -> Result<E, MappingError>;

    fn to_dto(&self, entity: &E) -> E::Dto;
}

/// Rules for the three catalog aggregates.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogMappings;

impl Mapper<CatalogItem> for CatalogMappings {
    fn to_entity(&self, dto: CatalogItemDto) -> Result<CatalogItem, MappingError> {
        Ok(CatalogItem::new(
            dto.catalog_type_id,
            dto.catalog_brand_id,
            dto.description,
            dto.name,
            dto.price,
            dto.picture_uri.unwrap_or_default(),
        )
        .with_id(dto.id))
    }

    fn to_dto(&self, entity: &CatalogItem) -> CatalogItemDto {
        CatalogItemDto {
            id: entity.id,
            name: entity.name.clone(),
            description: entity.description.clone(),
            price: entity.price,
            picture_uri: Some(entity.picture_uri.clone()).filter(|uri| !uri.is_empty()),
            catalog_type_id: entity.catalog_type_id,
            catalog_brand_id: entity.catalog_brand_id,
        }
    }
}

impl Mapper<CatalogBrand> for CatalogMappings {
    fn to_entity(&self, dto: CatalogBrandDto) -> Result<CatalogBrand, MappingError> {
        Ok(CatalogBrand::new(dto.name).with_id(dto.id))
    }

    fn to_dto(&self, entity: &CatalogBrand) -> CatalogBrandDto {
        CatalogBrandDto {
            id: entity.id,
            name: entity.brand.clone(),
        }
    }
}

impl Mapper<CatalogType> for CatalogMappings {
    fn to_entity(&self, dto: CatalogTypeDto) -> Result<CatalogType, MappingError> {
        Ok(CatalogType::new(dto.name).with_id(dto.id))
    }

    fn to_dto(&self, entity: &CatalogType) -> CatalogTypeDto {
        CatalogTypeDto {
            id: entity.id,
            name: entity.kind.clone(),
        }
    }
}

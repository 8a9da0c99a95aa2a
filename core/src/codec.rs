//! Envelope codec: response bodies → entities.
//!
//! # Design
//! The remote API wraps payloads in kind-specific envelopes,
//! `{ "<single>": dto | null }` and `{ "<list>": [dto, ...] }`. An
//! `EnvelopeCodec` is built once per repository from the configured
//! `EnvelopeKeys`, so no runtime type inspection happens per call.
//!
//! Property names are matched case-insensitively on both the envelope and
//! the DTO: DTO keys are lowercased before serde sees them.
//!
//! # Failure policy
//! - `decode_list` reports every failure; a broken collection means the
//!   client and server disagree about the protocol.
//! - `decode_single` folds every failure into `None`; callers treat it as
//!   "no such entity".

use serde_json::{Map, Value};
use tracing::warn;

use crate::entity::Entity;
use crate::error::CodecError;
use crate::mapping::Mapper;
use crate::registry::EnvelopeKeys;

#[derive(Debug, Clone)]
pub struct EnvelopeCodec {
    keys: EnvelopeKeys,
}

impl EnvelopeCodec {
    pub fn new(keys: EnvelopeKeys) -> Self {
        Self { keys }
    }

    /// Decode a list envelope. A missing collection property decodes as an
    /// empty collection; an explicit `null` does not.
    pub fn decode_list<E, M>(&self, body: &str, mapper: &M) -> Result<Vec<E>, CodecError>
    where
        E: Entity,
        M: Mapper<E> + ?Sized,
    {
        let envelope: Map<String, Value> = serde_json::from_str(body)?;
        let dtos = match property(envelope, &self.keys.list) {
            None => return Ok(Vec::new()),
            Some(Value::Null) => {
                return Err(CodecError::NullCollection {
                    key: self.keys.list.clone(),
                })
            }
            Some(value) => value,
        };
        let dtos: Vec<Value> = serde_json::from_value(dtos)?;

        dtos.into_iter()
            .map(|dto| decode_entity(dto, mapper))
            .collect()
    }

    /// Decode a single envelope; absence and any failure both yield `None`.
    pub fn decode_single<E, M>(&self, body: &str, mapper: &M) -> Option<E>
    where
        E: Entity,
        M: Mapper<E> + ?Sized,
    {
        match self.try_decode_single(body, mapper) {
            Ok(entity) => entity,
            Err(err) => {
                warn!(kind = %E::KIND, key = %self.keys.single, error = %err, "single envelope decoded as absent");
                None
            }
        }
    }

    fn try_decode_single<E, M>(&self, body: &str, mapper: &M) -> Result<Option<E>, CodecError>
    where
        E: Entity,
        M: Mapper<E> + ?Sized,
    {
        let envelope: Map<String, Value> = serde_json::from_str(body)?;
        match property(envelope, &self.keys.single) {
            None | Some(Value::Null) => Ok(None),
            Some(dto) => decode_entity(dto, mapper).map(Some),
        }
    }
}

/// Take a property out of an object, ignoring ASCII case. An exact match
/// wins over a case-folded one.
fn property(mut object: Map<String, Value>, key: &str) -> Option<Value> {
    if let Some(value) = object.remove(key) {
        return Some(value);
    }
    let found = object.keys().find(|k| k.eq_ignore_ascii_case(key))?.clone();
    object.remove(&found)
}

fn decode_entity<E, M>(dto: Value, mapper: &M) -> Result<E, CodecError>
where
    E: Entity,
    M: Mapper<E> + ?Sized,
{
    let dto: E::Dto = serde_json::from_value(lowercase_keys(dto))?;
    Ok(mapper.to_entity(dto)?)
}

fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(object) => Value::Object(
            object
                .into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::CatalogBrandDto;
    use crate::entity::{CatalogBrand, CatalogItem};
    use crate::error::MappingError;
    use crate::mapping::CatalogMappings;

    /// Refuses brands without a name.
    struct NamedBrandsOnly;

    impl Mapper<CatalogBrand> for NamedBrandsOnly {
        fn to_entity(&self, dto: CatalogBrandDto) -> Result<CatalogBrand, MappingError> {
            if dto.name.is_empty() {
                return Err(MappingError::new(CatalogBrand::KIND, "name must not be empty"));
            }
            Ok(CatalogBrand::new(dto.name).with_id(dto.id))
        }

        fn to_dto(&self, entity: &CatalogBrand) -> CatalogBrandDto {
            CatalogMappings.to_dto(entity)
        }
    }

    fn brands() -> EnvelopeCodec {
        EnvelopeCodec::new(EnvelopeKeys::new("catalogBrand", "catalogBrands"))
    }

    fn items() -> EnvelopeCodec {
        EnvelopeCodec::new(EnvelopeKeys::new("catalogItem", "catalogItems"))
    }

    #[test]
    fn decode_list_preserves_server_order() {
        let body = r#"{"catalogBrands":[{"id":2,"name":"Azure"},{"id":1,"name":".NET"},{"id":3,"name":"Roslyn"}]}"#;
        let decoded: Vec<CatalogBrand> = brands().decode_list(body, &CatalogMappings).unwrap();
        let ids: Vec<i32> = decoded.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(decoded[1].brand, ".NET");
    }

    #[test]
    fn decode_list_matches_names_case_insensitively() {
        let body = r#"{"CATALOGITEMS":[{"Id":4,"NAME":"Cup<T>","Description":"Mug","Price":8.5,"PictureUri":"http://x/4.png","CatalogTypeId":1,"catalogBRANDid":5}]}"#;
        let decoded: Vec<CatalogItem> = items().decode_list(body, &CatalogMappings).unwrap();
        assert_eq!(decoded.len(), 1);
        let item = &decoded[0];
        assert_eq!(item.id, 4);
        assert_eq!(item.name, "Cup<T>");
        assert_eq!(item.picture_uri, "http://x/4.png");
        assert_eq!(item.catalog_type_id, 1);
        assert_eq!(item.catalog_brand_id, 5);
    }

    #[test]
    fn decode_list_missing_property_is_empty() {
        let decoded: Vec<CatalogBrand> = brands().decode_list("{}", &CatalogMappings).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn decode_list_null_property_fails() {
        let err = brands()
            .decode_list::<CatalogBrand, _>(r#"{"catalogBrands":null}"#, &CatalogMappings)
            .unwrap_err();
        assert!(matches!(err, CodecError::NullCollection { .. }));
    }

    #[test]
    fn decode_list_malformed_json_fails() {
        let err = brands()
            .decode_list::<CatalogBrand, _>("<html>oops</html>", &CatalogMappings)
            .unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn decode_list_keeps_rows_with_missing_fields() {
        let body = r#"{"catalogBrands":[{"id":1,"name":"Azure"},{"id":2}]}"#;
        let decoded: Vec<CatalogBrand> = brands().decode_list(body, &CatalogMappings).unwrap();
        assert_eq!(
            decoded,
            vec![CatalogBrand::new("Azure").with_id(1), CatalogBrand::new("").with_id(2)]
        );
    }

    #[test]
    fn decode_list_rejected_entity_fails_whole_collection() {
        let body = r#"{"catalogBrands":[{"id":1,"name":"Azure"},{"id":2,"name":""}]}"#;
        let err = brands()
            .decode_list::<CatalogBrand, _>(body, &NamedBrandsOnly)
            .unwrap_err();
        assert!(matches!(err, CodecError::Mapping(_)));
    }

    #[test]
    fn decode_list_wrong_field_type_fails() {
        let body = r#"{"catalogBrands":[{"id":"one","name":"Azure"}]}"#;
        let err = brands()
            .decode_list::<CatalogBrand, _>(body, &CatalogMappings)
            .unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn decode_single_unwraps_envelope() {
        let body = r#"{"catalogBrand":{"id":3,"name":"Visual Studio"}}"#;
        let brand: Option<CatalogBrand> = brands().decode_single(body, &CatalogMappings);
        assert_eq!(brand, Some(CatalogBrand::new("Visual Studio").with_id(3)));
    }

    #[test]
    fn decode_single_null_is_absent() {
        let brand: Option<CatalogBrand> =
            brands().decode_single(r#"{"catalogBrand":null}"#, &CatalogMappings);
        assert!(brand.is_none());
    }

    #[test]
    fn decode_single_failures_are_absent() {
        for body in [
            "",
            "not json",
            "[]",
            r#"{"catalogBrand":42}"#,
            r#"{"catalogBrand":{"id":"three","name":"Azure"}}"#,
            r#"{"type":"https://tools.ietf.org/html/rfc7231#section-6.5.4","status":404}"#,
        ] {
            let brand: Option<CatalogBrand> = brands().decode_single(body, &CatalogMappings);
            assert!(brand.is_none(), "{body:?} should decode as absent");
        }
    }

    #[test]
    fn decode_single_rejected_entity_is_absent() {
        let body = r#"{"catalogBrand":{"id":3,"name":""}}"#;
        assert!(brands().decode_single::<CatalogBrand, _>(body, &NamedBrandsOnly).is_none());
        let kept: Option<CatalogBrand> = brands().decode_single(body, &CatalogMappings);
        assert_eq!(kept, Some(CatalogBrand::new("").with_id(3)));
    }

    #[test]
    fn exact_key_wins_over_case_folded_key() {
        let body = r#"{"CatalogBrand":{"id":1,"name":"Other"},"catalogBrand":{"id":2,"name":"Exact"}}"#;
        let brand: Option<CatalogBrand> = brands().decode_single(body, &CatalogMappings);
        assert_eq!(brand.unwrap().id, 2);
    }
}

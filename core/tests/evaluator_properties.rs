//! Property-based tests for specification evaluation.
//!
//! These hold for any catalog and any specification:
//! - Filter soundness: every returned item satisfies every predicate
//! - Stable ordering: items equal on all sort keys keep their filtered order
//! - Paging: `skip(a).take(b)` is the slice `[a, a + b)` of the unpaged result
//!
//! A decoded list envelope evaluated with an empty specification returns the
//! input entities unchanged and in server order.

use std::cmp::Ordering;

use catalog_core::evaluator::evaluate;
use catalog_core::{
    CatalogItem, CatalogMappings, Direction, EntityKind, EnvelopeCodec, EnvelopeTable, Mapper,
    Specification,
};
use proptest::prelude::*;
use serde_json::{json, Value};

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum SortKey {
    Brand,
    Type,
    Price,
}

impl SortKey {
    fn compare(self, a: &CatalogItem, b: &CatalogItem) -> Ordering {
        match self {
            SortKey::Brand => a.catalog_brand_id.cmp(&b.catalog_brand_id),
            SortKey::Type => a.catalog_type_id.cmp(&b.catalog_type_id),
            SortKey::Price => a.price.total_cmp(&b.price),
        }
    }
}

fn sort_key_strategy() -> impl Strategy<Value = SortKey> {
    prop_oneof![Just(SortKey::Brand), Just(SortKey::Type), Just(SortKey::Price)]
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Ascending), Just(Direction::Descending)]
}

fn orderings_strategy() -> impl Strategy<Value = Vec<(SortKey, Direction)>> {
    prop::collection::vec((sort_key_strategy(), direction_strategy()), 0..4)
}

/// Half-unit prices over a narrow range so ties are common.
fn price_strategy() -> impl Strategy<Value = f64> {
    (0u32..40).prop_map(|halves| f64::from(halves) / 2.0)
}

fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 .<>&-]{0,24}").unwrap()
}

/// Items get ids `1..=n` in input order, so ids double as source positions.
fn catalog_strategy() -> impl Strategy<Value = Vec<CatalogItem>> {
    prop::collection::vec(
        (1..4i32, 1..5i32, price_strategy(), name_strategy(), name_strategy()),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .zip(1..)
            .map(|((type_id, brand_id, price, name, description), id)| {
                CatalogItem::new(type_id, brand_id, description, name, price, "").with_id(id)
            })
            .collect()
    })
}

fn ordered(spec: Specification<CatalogItem>, orderings: &[(SortKey, Direction)]) -> Specification<CatalogItem> {
    orderings.iter().fold(spec, |spec, &(key, direction)| {
        spec.order_by_cmp(move |a: &CatalogItem, b: &CatalogItem| key.compare(a, b), direction)
    })
}

fn compare_all(orderings: &[(SortKey, Direction)], a: &CatalogItem, b: &CatalogItem) -> Ordering {
    orderings
        .iter()
        .map(|&(key, direction)| match direction {
            Direction::Ascending => key.compare(a, b),
            Direction::Descending => key.compare(b, a),
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn ids(items: &[CatalogItem]) -> Vec<i32> {
    items.iter().map(|i| i.id).collect()
}

// =============================================================================
// FILTER PROPERTIES
// =============================================================================

mod filter_properties {
    use super::*;

    proptest! {
        /// No returned item fails any predicate, and none that passes is lost.
        #[test]
        fn filtered_items_satisfy_every_predicate(
            catalog in catalog_strategy(),
            max_price in price_strategy(),
            brand in 1..5i32,
            orderings in orderings_strategy(),
        ) {
            let spec = ordered(
                Specification::new()
                    .filter(move |i: &CatalogItem| i.price <= max_price)
                    .filter(move |i: &CatalogItem| i.catalog_brand_id != brand),
                &orderings,
            );

            let result = evaluate(&spec, catalog.clone());

            prop_assert!(result.iter().all(|i| i.price <= max_price && i.catalog_brand_id != brand));
            let expected = catalog
                .iter()
                .filter(|i| i.price <= max_price && i.catalog_brand_id != brand)
                .count();
            prop_assert_eq!(result.len(), expected);
        }
    }
}

// =============================================================================
// ORDERING PROPERTIES
// =============================================================================

mod ordering_properties {
    use super::*;

    proptest! {
        /// Adjacent results are in key order; equal-key neighbours keep the
        /// order they had after filtering.
        #[test]
        fn sort_is_ordered_and_stable(
            catalog in catalog_strategy(),
            min_type in 1..4i32,
            orderings in orderings_strategy(),
        ) {
            let spec = ordered(
                Specification::new().filter(move |i: &CatalogItem| i.catalog_type_id >= min_type),
                &orderings,
            );

            let result = evaluate(&spec, catalog);

            for pair in result.windows(2) {
                let ordering = compare_all(&orderings, &pair[0], &pair[1]);
                prop_assert_ne!(ordering, Ordering::Greater);
                if ordering == Ordering::Equal {
                    prop_assert!(pair[0].id < pair[1].id, "tie reordered: {} before {}", pair[0].id, pair[1].id);
                }
            }
        }

        /// Without sort clauses the filtered source order is the result.
        #[test]
        fn unordered_specification_keeps_source_order(
            catalog in catalog_strategy(),
            max_price in price_strategy(),
        ) {
            let spec = Specification::new().filter(move |i: &CatalogItem| i.price <= max_price);
            let result = evaluate(&spec, catalog.clone());
            let expected: Vec<CatalogItem> = catalog.into_iter().filter(|i| i.price <= max_price).collect();
            prop_assert_eq!(result, expected);
        }
    }
}

// =============================================================================
// PAGING PROPERTIES
// =============================================================================

mod paging_properties {
    use super::*;

    proptest! {
        /// `skip(a).take(b)` equals the `[a, a + b)` slice of the unpaged result,
        /// clamped to its length.
        #[test]
        fn page_is_a_slice_of_unpaged_result(
            catalog in catalog_strategy(),
            orderings in orderings_strategy(),
            skip in 0usize..50,
            take in 0usize..50,
        ) {
            let unpaged = evaluate(&ordered(Specification::new(), &orderings), catalog.clone());
            let paged = evaluate(&ordered(Specification::new(), &orderings).skip(skip).take(take), catalog);

            let start = skip.min(unpaged.len());
            let end = skip.saturating_add(take).min(unpaged.len());
            prop_assert_eq!(ids(&paged), ids(&unpaged[start..end]));
        }

        /// `skip` alone drops a prefix; `take` alone keeps one.
        #[test]
        fn skip_and_take_alone(
            catalog in catalog_strategy(),
            count in 0usize..50,
        ) {
            let skipped = evaluate(&Specification::new().skip(count), catalog.clone());
            let taken = evaluate(&Specification::new().take(count), catalog.clone());

            let split = count.min(catalog.len());
            prop_assert_eq!(ids(&skipped), ids(&catalog[split..]));
            prop_assert_eq!(ids(&taken), ids(&catalog[..split]));
        }
    }
}

// =============================================================================
// DECODE THEN EVALUATE
// =============================================================================

mod decode_properties {
    use super::*;

    fn envelope(items: &[CatalogItem]) -> String {
        let dtos: Vec<Value> = items
            .iter()
            .map(|item| serde_json::to_value(Mapper::<CatalogItem>::to_dto(&CatalogMappings, item)).unwrap())
            .collect();
        json!({ "catalogItems": dtos }).to_string()
    }

    proptest! {
        /// A list envelope of N items evaluated with an empty specification
        /// yields those N entities in server order.
        #[test]
        fn decoded_list_round_trips_in_order(catalog in catalog_strategy()) {
            let keys = EnvelopeTable::default().resolve(EntityKind::CatalogItem).unwrap().clone();
            let codec = EnvelopeCodec::new(keys);

            let decoded: Vec<CatalogItem> = codec.decode_list(&envelope(&catalog), &CatalogMappings).unwrap();
            let result = evaluate(&Specification::new(), decoded);

            prop_assert_eq!(result.len(), catalog.len());
            prop_assert_eq!(result, catalog);
        }
    }
}

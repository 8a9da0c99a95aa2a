//! In-memory specification evaluator.
//!
//! Pipeline, always in this order: filter → stable multi-key sort →
//! skip/take → projection. Pure; no I/O.

use std::cmp::Ordering;

use crate::error::RepositoryError;
use crate::specification::{Direction, OrderClause, Projection, Query, Specification};

pub fn evaluate<E>(spec: &Specification<E>, items: Vec<E>) -> Vec<E> {
    let mut kept: Vec<E> = items
        .into_iter()
        .filter(|item| spec.filters.iter().all(|predicate| predicate(item)))
        .collect();

    if !spec.orderings.is_empty() {
        // `sort_by` is stable: ties keep their filtered order.
        kept.sort_by(|a, b| compare(&spec.orderings, a, b));
    }

    let skip = spec.skip.unwrap_or(0);
    let take = spec.take.unwrap_or(usize::MAX);
    kept.into_iter().skip(skip).take(take).collect()
}

pub fn evaluate_projected<E, R>(projection: &Projection<E, R>, items: Vec<E>) -> Vec<R> {
    evaluate(&projection.base, items)
        .iter()
        .map(|item| (projection.selector)(item))
        .collect()
}

/// First result of the pipeline, if any.
pub fn first_or_default<E, Q>(query: &Q, items: Vec<E>) -> Option<Q::Output>
where
    Q: Query<E> + ?Sized,
{
    query.evaluate(items).into_iter().next()
}

/// The only result of the pipeline. Zero matches is `Ok(None)`; more than
/// one is `MultipleResultsUnexpected`.
pub fn single_or_default<E, Q>(query: &Q, items: Vec<E>) -> Result<Option<Q::Output>, RepositoryError>
where
    Q: Query<E> + ?Sized,
{
    let mut results = query.evaluate(items);
    match results.len() {
        0 => Ok(None),
        1 => Ok(results.pop()),
        count => Err(RepositoryError::MultipleResultsUnexpected { count }),
    }
}

fn compare<E>(clauses: &[OrderClause<E>], a: &E, b: &E) -> Ordering {
    clauses
        .iter()
        .map(|clause| match clause.direction {
            Direction::Ascending => (clause.compare)(a, b),
            Direction::Descending => (clause.compare)(b, a),
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

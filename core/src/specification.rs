//! Data-source-agnostic query descriptions.
//!
//! A `Specification<E>` is a conjunction of filters, an ordered list of sort
//! clauses and optional skip/take bounds. `select` turns it into a
//! `Projection<E, R>`. Both are immutable once built: every builder method
//! consumes the value and returns a new one. Evaluation lives in
//! `crate::evaluator`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::evaluator;

pub(crate) type Predicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;
pub(crate) type Comparator<E> = Arc<dyn Fn(&E, &E) -> Ordering + Send + Sync>;
pub(crate) type Selector<E, R> = Arc<dyn Fn(&E) -> R + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

pub(crate) struct OrderClause<E> {
    pub(crate) compare: Comparator<E>,
    pub(crate) direction: Direction,
}

impl<E> Clone for OrderClause<E> {
    fn clone(&self) -> Self {
        Self {
            compare: Arc::clone(&self.compare),
            direction: self.direction,
        }
    }
}

/// Filter, order and page criteria over entities of one type.
pub struct Specification<E> {
    pub(crate) filters: Vec<Predicate<E>>,
    pub(crate) orderings: Vec<OrderClause<E>>,
    pub(crate) skip: Option<usize>,
    pub(crate) take: Option<usize>,
}

impl<E> Specification<E> {
    /// Matches everything, in source order, unbounded.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            orderings: Vec::new(),
            skip: None,
            take: None,
        }
    }

    /// Add a predicate; all predicates must hold for an item to survive.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(predicate));
        self
    }

    /// Append an ascending sort clause on `key`. Earlier clauses take
    /// precedence; later ones only break ties.
    pub fn order_by<K, F>(self, key: F) -> Self
    where
        K: Ord,
        F: Fn(&E) -> K + Send + Sync + 'static,
    {
        self.order_by_cmp(move |a, b| key(a).cmp(&key(b)), Direction::Ascending)
    }

    pub fn order_by_descending<K, F>(self, key: F) -> Self
    where
        K: Ord,
        F: Fn(&E) -> K + Send + Sync + 'static,
    {
        self.order_by_cmp(move |a, b| key(a).cmp(&key(b)), Direction::Descending)
    }

    /// Append a sort clause with an explicit comparator, for keys that are
    /// not `Ord` (prices, for instance).
    pub fn order_by_cmp<F>(mut self, compare: F, direction: Direction) -> Self
    where
        F: Fn(&E, &E) -> Ordering + Send + Sync + 'static,
    {
        self.orderings.push(OrderClause {
            compare: Arc::new(compare),
            direction,
        });
        self
    }

    pub fn skip(mut self, count: usize) -> Self {
        self.skip = Some(count);
        self
    }

    pub fn take(mut self, count: usize) -> Self {
        self.take = Some(count);
        self
    }

    /// Project every surviving item through `selector`.
    pub fn select<R, F>(self, selector: F) -> Projection<E, R>
    where
        F: Fn(&E) -> R + Send + Sync + 'static,
    {
        Projection {
            base: self,
            selector: Arc::new(selector),
        }
    }
}

impl<E> Default for Specification<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Specification<E> {
    fn clone(&self) -> Self {
        Self {
            filters: self.filters.clone(),
            orderings: self.orderings.clone(),
            skip: self.skip,
            take: self.take,
        }
    }
}

impl<E> fmt::Debug for Specification<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specification")
            .field("filters", &self.filters.len())
            .field(
                "orderings",
                &self.orderings.iter().map(|o| o.direction).collect::<Vec<_>>(),
            )
            .field("skip", &self.skip)
            .field("take", &self.take)
            .finish()
    }
}

/// A specification whose results are mapped to `R`.
pub struct Projection<E, R> {
    pub(crate) base: Specification<E>,
    pub(crate) selector: Selector<E, R>,
}

impl<E, R> Clone for Projection<E, R> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            selector: Arc::clone(&self.selector),
        }
    }
}

impl<E, R> fmt::Debug for Projection<E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projection").field("base", &self.base).finish()
    }
}

/// Anything the evaluator can run against a materialized collection.
pub trait Query<E>: Send + Sync {
    type Output: Send + 'static;

    fn evaluate(&self, items: Vec<E>) -> Vec<Self::Output>;
}

impl<E: Send + Sync + 'static> Query<E> for Specification<E> {
    type Output = E;

    fn evaluate(&self, items: Vec<E>) -> Vec<E> {
        evaluator::evaluate(self, items)
    }
}

impl<E, R> Query<E> for Projection<E, R>
where
    E: Send + Sync + 'static,
    R: Send + 'static,
{
    type Output = R;

    fn evaluate(&self, items: Vec<E>) -> Vec<R> {
        evaluator::evaluate_projected(self, items)
    }
}

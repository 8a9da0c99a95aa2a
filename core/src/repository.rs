//! Remote repository adapter.
//!
//! # Design
//! `HttpRepository<E, T, M>` gives one entity type a CRUD and query surface
//! over the catalog REST API. The route and envelope pair for `E::KIND` are
//! resolved once in `new`; every call afterwards is one request built by
//! `ResourceClient`, executed by the `Transport`, and interpreted here.
//!
//! Queries fetch the whole collection and evaluate the specification in
//! memory; the remote API has no query language.
//!
//! # Failure policy
//! - single reads: non-success status or undecodable body → `Ok(None)`
//! - collection reads: non-success status or undecodable body →
//!   `RetrievalFailed`
//! - writes: non-success status → `RemoteWriteFailed`
//! - range writes: sequential, in input order; the first failure stops the
//!   run and nothing already written is undone
//!
//! No retries. Every network wait races the caller's `CancellationToken`.

use std::fmt::Display;
use std::marker::PhantomData;

use futures::stream::{self, Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::ResourceClient;
use crate::codec::EnvelopeCodec;
use crate::config::RepositoryConfig;
use crate::entity::{CatalogBrand, CatalogItem, CatalogType, Entity};
use crate::error::{RepositoryError, RepositoryResult};
use crate::evaluator;
use crate::http::{HttpRequest, HttpResponse};
use crate::mapping::{CatalogMappings, Mapper};
use crate::registry::EntityKind;
use crate::specification::Query;
use crate::transport::Transport;

pub type CatalogItemRepository<T> = HttpRepository<CatalogItem, T, CatalogMappings>;
pub type CatalogBrandRepository<T> = HttpRepository<CatalogBrand, T, CatalogMappings>;
pub type CatalogTypeRepository<T> = HttpRepository<CatalogType, T, CatalogMappings>;

pub struct HttpRepository<E, T, M> {
    transport: T,
    mapper: M,
    client: ResourceClient,
    codec: EnvelopeCodec,
    _entity: PhantomData<fn() -> E>,
}

impl<E, T, M> HttpRepository<E, T, M>
where
    E: Entity,
    T: Transport,
    M: Mapper<E>,
{
    /// Bind a repository for `E`. Fails with `UnsupportedType` when the
    /// configuration lacks a route or an envelope pair for `E::KIND`.
    pub fn new(transport: T, mapper: M, config: &RepositoryConfig) -> RepositoryResult<Self> {
        let route = config.routes.resolve(E::KIND)?;
        let keys = config.envelopes.resolve(E::KIND)?.clone();

        Ok(Self {
            transport,
            mapper,
            client: ResourceClient::new(&config.base_url, route),
            codec: EnvelopeCodec::new(keys),
            _entity: PhantomData,
        })
    }

    pub fn kind(&self) -> EntityKind {
        E::KIND
    }

    pub fn collection_url(&self) -> &str {
        self.client.collection_url()
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// GET `{route}/{id}`. Any non-success status or undecodable body is
    /// `Ok(None)`.
    pub async fn get_by_id<I>(&self, id: &I, cancel: &CancellationToken) -> RepositoryResult<Option<E>>
    where
        I: Display + Sync + ?Sized,
    {
        let request = self.client.build_get(id);
        let response = self.send(request, cancel).await?;
        if !response.is_success() {
            debug!(kind = %E::KIND, status = response.status, "single read returned no entity");
            return Ok(None);
        }
        Ok(self.codec.decode_single(&response.body, &self.mapper))
    }

    /// First result of `spec` evaluated over the full collection.
    pub async fn get_by_spec<Q>(&self, spec: &Q, cancel: &CancellationToken) -> RepositoryResult<Option<Q::Output>>
    where
        Q: Query<E> + ?Sized,
    {
        let items = self.fetch_all(cancel).await?;
        Ok(evaluator::first_or_default(spec, items))
    }

    pub async fn first_or_default<Q>(&self, spec: &Q, cancel: &CancellationToken) -> RepositoryResult<Option<Q::Output>>
    where
        Q: Query<E> + ?Sized,
    {
        let results = self.list_by(spec, cancel).await?;
        Ok(results.into_iter().next())
    }

    /// Like `get_by_spec`, but more than one match is
    /// `MultipleResultsUnexpected`.
    pub async fn single_or_default<Q>(&self, spec: &Q, cancel: &CancellationToken) -> RepositoryResult<Option<Q::Output>>
    where
        Q: Query<E> + ?Sized,
    {
        let items = self.fetch_all(cancel).await?;
        evaluator::single_or_default(spec, items)
    }

    pub async fn list(&self, cancel: &CancellationToken) -> RepositoryResult<Vec<E>> {
        self.fetch_all(cancel).await
    }

    pub async fn list_by<Q>(&self, spec: &Q, cancel: &CancellationToken) -> RepositoryResult<Vec<Q::Output>>
    where
        Q: Query<E> + ?Sized,
    {
        let items = self.fetch_all(cancel).await?;
        Ok(spec.evaluate(items))
    }

    pub async fn count(&self, cancel: &CancellationToken) -> RepositoryResult<usize> {
        Ok(self.list(cancel).await?.len())
    }

    pub async fn count_by<Q>(&self, spec: &Q, cancel: &CancellationToken) -> RepositoryResult<usize>
    where
        Q: Query<E> + ?Sized,
    {
        Ok(self.list_by(spec, cancel).await?.len())
    }

    pub async fn any(&self, cancel: &CancellationToken) -> RepositoryResult<bool> {
        Ok(!self.list(cancel).await?.is_empty())
    }

    pub async fn any_by<Q>(&self, spec: &Q, cancel: &CancellationToken) -> RepositoryResult<bool>
    where
        Q: Query<E> + ?Sized,
    {
        Ok(!self.list_by(spec, cancel).await?.is_empty())
    }

    /// Results of `spec` as a stream.
    ///
    /// The whole collection is fetched and evaluated on first poll; items are
    /// then handed out one at a time. Nothing is streamed from the network.
    pub fn as_stream<'a, Q>(
        &'a self,
        spec: &'a Q,
        cancel: &'a CancellationToken,
    ) -> impl Stream<Item = RepositoryResult<Q::Output>> + 'a
    where
        Q: Query<E> + ?Sized,
    {
        stream::once(self.list_by(spec, cancel))
            .map(|result| match result {
                Ok(items) => stream::iter(items.into_iter().map(Ok)).left_stream(),
                Err(err) => stream::iter(std::iter::once(Err(err))).right_stream(),
            })
            .flatten()
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// POST the entity. Returns the server's echo of the created entity, or
    /// the input unchanged when the echo cannot be decoded.
    pub async fn add(&self, entity: E, cancel: &CancellationToken) -> RepositoryResult<E> {
        let body = serde_json::to_string(&self.mapper.to_dto(&entity))?;
        let response = self.write(self.client.build_create(body), cancel).await?;

        match self.codec.decode_single(&response.body, &self.mapper) {
            Some(created) => Ok(created),
            None => {
                warn!(kind = %E::KIND, "create echo not decodable, returning submitted entity");
                Ok(entity)
            }
        }
    }

    pub async fn add_range<I>(&self, entities: I, cancel: &CancellationToken) -> RepositoryResult<Vec<E>>
    where
        I: IntoIterator<Item = E>,
    {
        let mut created = Vec::new();
        for entity in entities {
            created.push(self.add(entity, cancel).await?);
        }
        Ok(created)
    }

    /// PUT the entity to the collection route; the response body is ignored.
    pub async fn update(&self, entity: &E, cancel: &CancellationToken) -> RepositoryResult<()> {
        let body = serde_json::to_string(&self.mapper.to_dto(entity))?;
        self.write(self.client.build_update(body), cancel).await?;
        Ok(())
    }

    pub async fn update_range(&self, entities: &[E], cancel: &CancellationToken) -> RepositoryResult<()> {
        for entity in entities {
            self.update(entity, cancel).await?;
        }
        Ok(())
    }

    /// DELETE `{route}/{id}` using the entity's identifier.
    pub async fn delete(&self, entity: &E, cancel: &CancellationToken) -> RepositoryResult<()> {
        self.write(self.client.build_delete(&entity.id()), cancel).await?;
        Ok(())
    }

    pub async fn delete_range(&self, entities: &[E], cancel: &CancellationToken) -> RepositoryResult<()> {
        for entity in entities {
            self.delete(entity, cancel).await?;
        }
        Ok(())
    }

    /// Every write is durable once its request succeeds, so there is nothing
    /// to flush.
    pub fn save_changes(&self) -> usize {
        0
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn send(&self, request: HttpRequest, cancel: &CancellationToken) -> RepositoryResult<HttpResponse> {
        debug!(kind = %E::KIND, method = %request.method, path = %request.path, "sending request");
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(RepositoryError::Cancelled),
            response = self.transport.execute(request) => Ok(response?),
        }
    }

    async fn fetch_all(&self, cancel: &CancellationToken) -> RepositoryResult<Vec<E>> {
        let response = self.send(self.client.build_list(), cancel).await?;
        if !response.is_success() {
            return Err(self.retrieval_failed(format!("HTTP {}", response.status)));
        }

        let items: Vec<E> = self
            .codec
            .decode_list(&response.body, &self.mapper)
            .map_err(|err| self.retrieval_failed(err.to_string()))?;
        debug!(kind = %E::KIND, count = items.len(), "decoded collection");
        Ok(items)
    }

    fn retrieval_failed(&self, reason: String) -> RepositoryError {
        RepositoryError::RetrievalFailed {
            route: self.client.collection_url().to_string(),
            reason,
        }
    }

    /// Send a write; a non-success status fails with the method and the
    /// exact URL that was requested.
    async fn write(&self, request: HttpRequest, cancel: &CancellationToken) -> RepositoryResult<HttpResponse> {
        let method = request.method;
        let route = request.path.clone();
        let response = self.send(request, cancel).await?;
        if response.is_success() {
            return Ok(response);
        }
        Err(RepositoryError::RemoteWriteFailed {
            method,
            route,
            status: response.status,
            body: response.body,
        })
    }
}

//! Query resolution pipeline.
//!
//! classify → retrieve → rank → filter → dedupe → assemble. Every stage is a
//! pure transform over per-request values; the only shared state is the
//! read-only [`PlaceStore`], whose calls are bounded by the configured timeout.

pub mod assembler;
pub mod classifier;
pub mod dedupe;
pub mod filter;
pub mod ranking;
pub mod request;
pub mod retriever;

pub use assembler::SearchResult;
pub use classifier::{classify, QueryMode, TextQuery};
pub use filter::FeatureType;
pub use request::{QuerySpec, SearchRequest, Viewbox};

use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch;
use tracing::debug;

use crate::address::AddressResolver;
use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::store::{PlaceStore, TimedStore};

/// Runs searches against one Place Store.
pub struct Searcher<S> {
    store: TimedStore<S>,
    config: SearchConfig,
    resolver: AddressResolver,
}

impl<S: PlaceStore> Searcher<S> {
    pub fn new(store: S, config: SearchConfig) -> Self {
        let timeout = Duration::from_millis(config.store.timeout_ms);
        let resolver = AddressResolver::new(config.limits.max_hierarchy_depth);
        Self {
            store: TimedStore::new(store, timeout),
            config,
            resolver,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Validate `request` and run it.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        let spec = QuerySpec::from_request(request, &self.config)?;
        self.run(&spec, None).await
    }

    /// Run an already validated query.
    pub async fn execute(&self, spec: &QuerySpec) -> Result<Vec<SearchResult>> {
        self.run(spec, None).await
    }

    /// Like [`Searcher::search`], aborting with [`SearchError::Cancelled`] once
    /// `cancel` reads `true`. Checked before every stage and raced against
    /// store lookups.
    pub async fn search_cancellable(
        &self,
        request: &SearchRequest,
        cancel: watch::Receiver<bool>,
    ) -> Result<Vec<SearchResult>> {
        checkpoint(Some(&cancel), "classify")?;
        let spec = QuerySpec::from_request(request, &self.config)?;
        self.run(&spec, Some(cancel)).await
    }

    /// Resolve independent requests concurrently. Results keep request order.
    pub async fn search_many(&self, requests: &[SearchRequest]) -> Vec<Result<Vec<SearchResult>>> {
        join_all(requests.iter().map(|request| self.search(request))).await
    }

    async fn run(
        &self,
        spec: &QuerySpec,
        cancel: Option<watch::Receiver<bool>>,
    ) -> Result<Vec<SearchResult>> {
        let pool = self.config.limits.candidate_pool.max(spec.limit);

        checkpoint(cancel.as_ref(), "retrieve")?;
        let retrieval = retriever::retrieve(&self.store, spec, pool);
        let candidates = match cancel.clone() {
            Some(mut rx) => tokio::select! {
                found = retrieval => found?,
                Ok(_) = rx.wait_for(|cancelled| *cancelled) => return Err(SearchError::Cancelled),
            },
            None => retrieval.await?,
        };

        checkpoint(cancel.as_ref(), "rank")?;
        let ranked = ranking::rank(candidates, spec, &self.config.ranking);
        debug!("Ranked {} candidates", ranked.len());

        checkpoint(cancel.as_ref(), "filter")?;
        let countries =
            filter::resolve_country_codes(&ranked, spec, &self.store, &self.resolver).await?;
        let filtered = filter::apply(ranked, spec, &countries);
        debug!("{} candidates left after filtering", filtered.len());

        let unique = if spec.dedupe {
            checkpoint(cancel.as_ref(), "dedupe")?;
            let unique = dedupe::dedupe(filtered, self.config.dedupe.distance_degrees);
            debug!("{} candidates left after dedupe", unique.len());
            unique
        } else {
            filtered
        };

        checkpoint(cancel.as_ref(), "assemble")?;
        let results = assembler::assemble(
            unique,
            spec,
            &self.store,
            &self.resolver,
            &self.config.output,
        )
        .await?;
        debug!("Returning {} results", results.len());

        Ok(results)
    }
}

fn checkpoint(cancel: Option<&watch::Receiver<bool>>, stage: &str) -> Result<()> {
    match cancel {
        Some(rx) if *rx.borrow() => {
            debug!("Search cancelled before {}", stage);
            Err(SearchError::Cancelled)
        }
        _ => Ok(()),
    }
}

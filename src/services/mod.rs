/// Business logic services layer
use crate::aggregates::{build_view, distinct_countries};
use crate::clients::{FeedEndpoints, FeedSource};
use crate::domain::{DashboardView, Earthquake, FeedQuery, FilterConfig, ViewOptions};
use crate::errors::FeedResult;
use crate::filters::DateWindow;
use crate::normalizer::Normalizer;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Generation number handed to each fetch; later tickets are newer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Normalized result of one fetch
#[derive(Debug, Clone)]
pub struct FetchedRecords {
    pub ticket: FetchTicket,
    pub query: FeedQuery,
    pub records: Vec<Earthquake>,
}

/// Endpoint selection, retrieval and normalization
pub struct FetchOrchestrator<S> {
    source: S,
    endpoints: FeedEndpoints,
    normalizer: Normalizer,
    generation: AtomicU64,
}

impl<S: FeedSource> FetchOrchestrator<S> {
    pub fn new(source: S, endpoints: FeedEndpoints, normalizer: Normalizer) -> Self {
        Self {
            source,
            endpoints,
            normalizer,
            generation: AtomicU64::new(0),
        }
    }

    /// True when no fetch was started after `ticket`
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    fn next_ticket(&self) -> FetchTicket {
        FetchTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Fetch, normalize and date-filter the records for `query`
    pub async fn fetch(&self, query: FeedQuery) -> FeedResult<FetchedRecords> {
        let ticket = self.next_ticket();
        let url = self.endpoints.url_for(query.time_range);
        let start = Instant::now();
        debug!(
            "Fetching feed - range={}, custom_dates={}, ticket={}",
            query.time_range,
            query.dates.is_some(),
            ticket.0
        );

        let feed = self.source.fetch_feed(url).await?;
        let mut records = self.normalizer.normalize_all(&feed.features);
        let fetched = records.len();

        if let Some(dates) = &query.dates {
            DateWindow::new(dates, &self.normalizer.display().offset).retain(&mut records);
        }

        info!(
            "Feed fetch completed - range={}, duration={:.2}s, fetched={}, kept={}",
            query.time_range,
            start.elapsed().as_secs_f32(),
            fetched,
            records.len()
        );

        Ok(FetchedRecords {
            ticket,
            query,
            records,
        })
    }
}

/// Last successfully applied fetch
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub ticket: FetchTicket,
    pub query: FeedQuery,
    pub records: Vec<Earthquake>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The snapshot now holds this many records
    Applied(usize),
    /// A newer refresh was started while this one was in flight
    Superseded,
}

/// Dashboard data holder consumed by the presentation layer
pub struct DashboardService<S> {
    orchestrator: FetchOrchestrator<S>,
    snapshot: RwLock<Option<Snapshot>>,
    options: ViewOptions,
}

impl<S: FeedSource> DashboardService<S> {
    pub fn new(orchestrator: FetchOrchestrator<S>, options: ViewOptions) -> Self {
        Self {
            orchestrator,
            snapshot: RwLock::new(None),
            options,
        }
    }

    /// Refetch the feed for `filters`, replacing the data on success.
    ///
    /// A failure leaves the previous snapshot in place. A result that
    /// arrives after a newer refresh was started is dropped.
    pub async fn refresh(&self, filters: &FilterConfig) -> FeedResult<RefreshOutcome> {
        let fetched = match self.orchestrator.fetch(filters.feed_query()).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!("Feed refresh failed ({}): {}", e.code(), e);
                return Err(e);
            }
        };

        let mut snapshot = self.snapshot.write().await;
        if !self.orchestrator.is_current(fetched.ticket) {
            debug!("Discarding stale fetch result - ticket={}", fetched.ticket.0);
            return Ok(RefreshOutcome::Superseded);
        }

        let count = fetched.records.len();
        *snapshot = Some(Snapshot {
            ticket: fetched.ticket,
            query: fetched.query,
            records: fetched.records,
            fetched_at: Utc::now(),
        });
        Ok(RefreshOutcome::Applied(count))
    }

    /// Every derived view for the current data and `filters`
    pub async fn view(&self, filters: &FilterConfig) -> DashboardView {
        let snapshot = self.snapshot.read().await;
        let records = snapshot.as_ref().map(|s| s.records.as_slice()).unwrap_or_default();
        build_view(records, filters, &self.options)
    }

    pub async fn countries(&self) -> Vec<String> {
        let snapshot = self.snapshot.read().await;
        snapshot
            .as_ref()
            .map(|s| distinct_countries(&s.records))
            .unwrap_or_default()
    }

    /// Look up a record for the selection panel
    pub async fn find(&self, id: &str) -> Option<Earthquake> {
        let snapshot = self.snapshot.read().await;
        snapshot
            .as_ref()?
            .records
            .iter()
            .find(|eq| eq.id == id)
            .cloned()
    }

    /// Query behind the current data, `None` before the first success
    pub async fn snapshot_query(&self) -> Option<FeedQuery> {
        self.snapshot.read().await.as_ref().map(|s| s.query)
    }

    /// When the current data was applied
    pub async fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot.read().await.as_ref().map(|s| s.fetched_at)
    }

    /// Ticket of the fetch behind the current data
    pub async fn snapshot_ticket(&self) -> Option<FetchTicket> {
        self.snapshot.read().await.as_ref().map(|s| s.ticket)
    }

    /// True when `filters` ask for different records than those loaded
    pub async fn needs_refresh(&self, filters: &FilterConfig) -> bool {
        self.snapshot_query().await != Some(filters.feed_query())
    }
}

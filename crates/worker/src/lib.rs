//! Caching worker for trailguide.
//!
//! This crate implements the offline caching core: request classification,
//! the per-resource-type fetch strategies, worker lifecycle
//! (install/activate), and the bulk tile-prefetch coordinator driven by
//! `CACHE_TILES` messages.

pub mod classify;
pub mod dispatch;
pub mod fetch;
pub mod lifecycle;
pub mod prefetch;
pub mod serve;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::{ResourceClass, RouteTable, classify};
pub use dispatch::Dispatcher;
pub use fetch::{FetchedResponse, Fetcher, HttpFetcher};
pub use lifecycle::Lifecycle;
pub use prefetch::PrefetchCoordinator;
pub use serve::{CacheRequest, ServeSource, ServedResponse};
pub use worker::{CacheWorker, WorkerMessage};

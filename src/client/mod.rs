//! Strategy selection, remote shim and per-pass caching.
//!
//! Callers hold a [`RankService`], which serves repeated
//! `(employee_id, target_date)` lookups from a [`RankCache`] and sends the
//! rest to a [`RankStrategy`] chosen by [`build_strategy`].

mod cache;
mod remote;
mod service;
mod strategy;

pub use cache::RankCache;
pub use remote::RemoteStrategy;
pub use service::RankService;
pub use strategy::{LocalStrategy, RankStrategy, build_strategy};

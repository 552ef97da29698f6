//! HTTP API module for the rank engine.
//!
//! This module exposes the pure rank query over HTTP so that remote
//! callers can batch many employees into one round trip.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BatchRankRequest, RankRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;

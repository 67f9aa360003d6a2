//! Shared types for the feedback pipeline.
//!
//! `models` holds the stored rows as the rest of the workspace sees them,
//! `api` the HTTP request/response bodies, and `events` the ephemeral payload
//! handed from ingestion to notification dispatch.

pub mod api;
pub mod events;
pub mod models;

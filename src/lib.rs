//! Transport Content API
//!
//! Content management backend for a regional transport company: CRUD over
//! services, regions, news, schedule and company info, plus an aggregate
//! read that feeds the public landing page.
//!
//! Requests arrive either as plain HTTP (`/` or `/content?entity=...`) or as
//! gateway trigger events (`POST /events`). Both paths run the same
//! [`handler::ContentHandler`].

pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod event;
pub mod handler;
pub mod models;
pub mod routes;
pub mod routing;
pub mod state;

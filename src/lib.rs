//! Locale routing for multi-language static sites.
//!
//! - [`i18n`]: the routing engine (path map, matching, codec, redirects, client tracker)
//! - [`config`]: router and process configuration
//! - [`server`]: axum static server with locale redirects

pub mod config;
pub mod i18n;
pub mod server;

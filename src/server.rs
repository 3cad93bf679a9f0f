//! HTTP surface: a static file server with locale redirects in front.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::config::{normalize_base, Config};
use crate::i18n::{
    cookie_value, locale_cookie, Action, ClientSnapshot, LocalePathMap, PreferenceSignals,
    RedirectPolicy, LOCALE_COOKIE,
};

/// Path the client config artifact is served from, relative to the site base.
pub const SNAPSHOT_PATH: &str = "__i18n/snapshot.js";

/// Shared, read-only request state.
#[derive(Debug)]
pub struct AppState {
    pub map: LocalePathMap,
    /// Deployment base, `/` or `/docs/`.
    pub base: String,
    pub snapshot_script: String,
}

impl AppState {
    pub fn new(map: LocalePathMap, base: &str) -> Result<Self> {
        let snapshot_script = ClientSnapshot::from_map(&map)
            .to_script()
            .context("Failed to serialize client snapshot")?;
        Ok(Self {
            map,
            base: normalize_base(base),
            snapshot_script,
        })
    }

    /// Request path relative to the base, or `None` when outside it.
    fn local_url<'u>(&self, url: &'u str) -> Option<&'u str> {
        if self.base == "/" {
            return Some(url);
        }
        let prefix = self.base.trim_end_matches('/');
        let rest = url.strip_prefix(prefix)?;
        match rest.chars().next() {
            None => Some("/"),
            Some('/') | Some('?') | Some('#') => Some(rest),
            Some(_) => None,
        }
    }

    fn public_url(&self, local: &str) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), local)
    }
}

/// Build the application router serving `site_dir`.
pub fn build_router(state: Arc<AppState>, site_dir: impl AsRef<Path>) -> Router {
    let snapshot_route = format!("{}{}", state.base, SNAPSHOT_PATH);

    Router::new()
        .route(&snapshot_route, get(snapshot_script))
        .fallback_service(ServeDir::new(site_dir.as_ref()))
        .layer(middleware::from_fn_with_state(state.clone(), locale_redirect))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn snapshot_script(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        state.snapshot_script.clone(),
    )
}

/// Redirect middleware: 301 for a locale root without trailing slash,
/// 302 (plus locale cookie) for URLs without a locale, otherwise pass through.
pub async fn locale_redirect(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let raw_url = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let Some(local_url) = state.local_url(&raw_url) else {
        return next.run(request).await;
    };

    let action = decide(&state, local_url, request.headers());
    debug!("{} -> {:?}", raw_url, action);

    match action {
        Action::PermanentRedirect(location) => (
            StatusCode::MOVED_PERMANENTLY,
            [(header::LOCATION, state.public_url(&location))],
        )
            .into_response(),
        Action::TemporaryRedirect { location, locale } => (
            StatusCode::FOUND,
            [
                (header::LOCATION, state.public_url(&location)),
                (header::SET_COOKIE, locale_cookie(&locale)),
            ],
        )
            .into_response(),
        Action::PassThrough => next.run(request).await,
    }
}

fn decide(state: &AppState, local_url: &str, headers: &HeaderMap) -> Action {
    // Browsers may split cookies over several headers.
    let cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| cookie_value(value, LOCALE_COOKIE).is_some());
    let accept_language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());
    let signals = PreferenceSignals::from_headers(cookie, accept_language);

    RedirectPolicy::new(&state.map).evaluate(local_url, &signals)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: Config) -> Result<()> {
    let map = LocalePathMap::from_config(&config.router)?;
    info!(
        "Routing {} locales: {} (default: {})",
        map.len(),
        map.all_locales().join(", "),
        map.default_locale()
    );

    let state = Arc::new(AppState::new(map, &config.site_base)?);
    let router = build_router(state, &config.site_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        "Serving {} on {} under {}",
        config.site_dir.display(),
        addr,
        config.site_base
    );
    axum::serve(listener, router).await.context("Server error")?;
    Ok(())
}

//! Integration tests for the i18n router
//!
//! These tests drive the full axum router (redirect middleware in front of
//! the static file server) and the environment-based configuration.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serial_test::serial;
use tempfile::TempDir;
use tower::ServiceExt;

use i18n_router::config::{Config, RouterConfig};
use i18n_router::i18n::{ClientSnapshot, LocalePathMap, RouteCodec};
use i18n_router::server::{build_router, AppState};

// ==================== Test Helpers ====================

const CONFIG_JSON: &str = r#"{
    "locales": {"zh-CN": "zh", "en-US": "en"},
    "defaultLocale": "en-US",
    "localeNames": {"zh-CN": "简体中文", "en-US": "English"},
    "switcherPosition": "nav"
}"#;

/// Create a built site with one page per locale plus an asset
fn create_site() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for (segment, title) in [("zh", "中文首页"), ("en", "English home")] {
        let locale_dir = dir.path().join(segment);
        std::fs::create_dir_all(locale_dir.join("guide")).expect("Failed to create dirs");
        std::fs::write(locale_dir.join("index.html"), title).expect("Failed to write page");
        std::fs::write(locale_dir.join("guide/intro.html"), format!("{} intro", title))
            .expect("Failed to write page");
    }
    std::fs::create_dir_all(dir.path().join("assets")).expect("Failed to create assets dir");
    std::fs::write(dir.path().join("assets/app.js"), "console.log(1)")
        .expect("Failed to write asset");
    dir
}

fn create_router(site: &TempDir, base: &str) -> Router {
    let config = RouterConfig::from_json(CONFIG_JSON).expect("Valid config");
    let map = LocalePathMap::from_config(&config).expect("Valid map");
    let state = Arc::new(AppState::new(map, base).expect("Valid state"));
    build_router(state, site.path())
}

async fn get(router: Router, uri: &str, headers: &[(header::HeaderName, &str)]) -> axum::response::Response {
    let mut request = Request::builder().uri(uri);
    for (name, value) in headers {
        request = request.header(name, *value);
    }
    router
        .oneshot(request.body(Body::empty()).expect("Valid request"))
        .await
        .expect("Router is infallible")
}

fn location(response: &axum::response::Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Readable body");
    String::from_utf8(bytes.to_vec()).expect("UTF-8 body")
}

// ==================== Redirect Tests ====================

#[tokio::test]
async fn test_root_redirects_by_accept_language() {
    let site = create_site();
    let response = get(
        create_router(&site, "/"),
        "/",
        &[(header::ACCEPT_LANGUAGE, "zh-HK,en;q=0.8")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/zh/"));
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("Locale cookie set");
    assert_eq!(cookie, "vitepress-locale=zh-CN; Path=/; Max-Age=31536000");
}

#[tokio::test]
async fn test_cookie_overrides_accept_language() {
    let site = create_site();
    let response = get(
        create_router(&site, "/"),
        "/guide/intro?ref=nav",
        &[
            (header::COOKIE, "theme=dark; vitepress-locale=en-US"),
            (header::ACCEPT_LANGUAGE, "zh-CN"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/en/guide/intro?ref=nav"));
}

#[tokio::test]
async fn test_locale_cookie_in_second_cookie_header() {
    let site = create_site();
    let response = get(
        create_router(&site, "/"),
        "/",
        &[
            (header::COOKIE, "theme=dark"),
            (header::COOKIE, "vitepress-locale=zh-CN"),
            (header::ACCEPT_LANGUAGE, "en-US"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/zh/"));
}

#[tokio::test]
async fn test_root_defaults_without_signals() {
    let site = create_site();
    let response = get(create_router(&site, "/"), "/", &[]).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/en/"));
}

#[tokio::test]
async fn test_locale_root_without_slash_is_permanent() {
    let site = create_site();
    let response = get(create_router(&site, "/"), "/zh", &[]).await;

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), Some("/zh/"));
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_redirect_target_is_served() {
    let site = create_site();
    let first = get(
        create_router(&site, "/"),
        "/",
        &[(header::ACCEPT_LANGUAGE, "zh-CN")],
    )
    .await;
    let target = location(&first).expect("Redirected").to_string();

    let second = get(
        create_router(&site, "/"),
        &target,
        &[(header::ACCEPT_LANGUAGE, "zh-CN")],
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_text(second).await, "中文首页");
}

// ==================== Pass-through Tests ====================

#[tokio::test]
async fn test_assets_pass_through() {
    let site = create_site();
    let response = get(create_router(&site, "/"), "/assets/app.js", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "console.log(1)");
}

#[tokio::test]
async fn test_snapshot_is_served() {
    let site = create_site();
    let response = get(create_router(&site, "/"), "/__i18n/snapshot.js", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.starts_with("window.__I18N_ROUTER__ = "));
    assert!(body.contains(r#""localeToPath":{"zh-CN":"zh","en-US":"en"}"#));
}

// ==================== Base Path Tests ====================

#[tokio::test]
async fn test_redirects_under_base() {
    let site = create_site();

    let response = get(
        create_router(&site, "/docs/"),
        "/docs/",
        &[(header::ACCEPT_LANGUAGE, "zh")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/docs/zh/"));

    let response = get(create_router(&site, "/docs/"), "/docs/en", &[]).await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), Some("/docs/en/"));
}

#[tokio::test]
async fn test_outside_base_is_not_redirected() {
    let site = create_site();
    let response = get(create_router(&site, "/docs/"), "/elsewhere", &[]).await;

    assert_ne!(response.status(), StatusCode::FOUND);
    assert!(location(&response).is_none());
}

// ==================== Snapshot Round Trip Tests ====================

#[test]
fn test_snapshot_drives_codec_like_config() {
    let config = RouterConfig::from_json(CONFIG_JSON).expect("Valid config");
    let map = LocalePathMap::from_config(&config).expect("Valid map");
    let json = ClientSnapshot::from_map(&map).to_json().expect("Serializable");
    let client_map = ClientSnapshot::from_json(&json)
        .expect("Parsable")
        .to_path_map()
        .expect("Valid map");

    let server = RouteCodec::new(&map);
    let client = RouteCodec::new(&client_map);
    for url in ["/", "/zh/guide/intro", "/en", "/about"] {
        assert_eq!(server.decode(url), client.decode(url), "url {}", url);
    }
}

// ==================== Environment Config Tests ====================

#[test]
#[serial]
fn test_config_from_env() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = dir.path().join("i18n.json");
    std::fs::write(&config_path, CONFIG_JSON).expect("Failed to write config");

    std::env::set_var("I18N_CONFIG", &config_path);
    std::env::set_var("SITE_DIR", "public");
    std::env::set_var("SITE_BASE", "docs");
    std::env::set_var("PORT", "3000");

    let config = Config::from_env().expect("Config should load");

    std::env::remove_var("I18N_CONFIG");
    std::env::remove_var("SITE_DIR");
    std::env::remove_var("SITE_BASE");
    std::env::remove_var("PORT");

    assert_eq!(config.router.default_locale, "en-US");
    assert_eq!(config.router.display_name("zh-CN"), "简体中文");
    assert_eq!(config.site_dir, std::path::PathBuf::from("public"));
    assert_eq!(config.site_base, "/docs/");
    assert_eq!(config.port, 3000);
}

#[test]
#[serial]
fn test_config_from_env_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = dir.path().join("i18n.json");
    std::fs::write(&config_path, r#"{"locales":["en"],"defaultLocale":"en"}"#)
        .expect("Failed to write config");

    std::env::set_var("I18N_CONFIG", &config_path);
    std::env::remove_var("SITE_DIR");
    std::env::remove_var("SITE_BASE");
    std::env::remove_var("PORT");

    let config = Config::from_env().expect("Config should load");
    std::env::remove_var("I18N_CONFIG");

    assert_eq!(
        config.site_dir,
        std::path::PathBuf::from("docs/.vitepress/dist")
    );
    assert_eq!(config.site_base, "/");
    assert_eq!(config.port, 8080);
}

#[test]
#[serial]
fn test_config_from_env_requires_config_path() {
    std::env::remove_var("I18N_CONFIG");
    let err = Config::from_env().unwrap_err();
    assert!(err.to_string().contains("I18N_CONFIG"));
}

#[test]
#[serial]
fn test_config_from_env_rejects_invalid_locales() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = dir.path().join("i18n.json");
    std::fs::write(
        &config_path,
        r#"{"locales":{"a":"x","b":"x"},"defaultLocale":"a"}"#,
    )
    .expect("Failed to write config");

    std::env::set_var("I18N_CONFIG", &config_path);
    let result = Config::from_env();
    std::env::remove_var("I18N_CONFIG");

    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("path segment 'x'"));
}

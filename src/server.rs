//! HTTP host for the dashboard.
//!
//! The page is rendered before the listener is bound; handlers only hand out
//! the stored HTML.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use crate::config::DashConfig;
use crate::state::Dashboard;

const STYLE_CSS: &str = include_str!("../assets/style.css");
const DASH_STYLES_CSS: &str = include_str!("../assets/dashstyles.css");

/// The dashboard sub-application mounted at `mount_path` (`""` for the root,
/// otherwise `/segment` without a trailing slash). The page lives at
/// `{mount_path}/`; the bare prefix redirects there.
pub fn dashboard_router(dashboard: Arc<Dashboard>, mount_path: &str) -> Router {
    let page_path = format!("{mount_path}/");
    let mut router = Router::new().route(&page_path, get(serve_page));
    if !mount_path.is_empty() {
        router = router.route(mount_path, get(move || redirect(page_path.clone(), true)));
    }
    router.with_state(dashboard)
}

/// Host application: the mounted dashboard plus the stylesheets its layout
/// links to. `/` sends visitors to the dashboard.
pub fn host_router(dashboard: Arc<Dashboard>, mount_path: &str) -> Router {
    let mut router = Router::new()
        .route("/static/style.css", get(|| async { css(STYLE_CSS) }))
        .route("/static/dashstyles.css", get(|| async { css(DASH_STYLES_CSS) }));
    if !mount_path.is_empty() {
        let page_path = format!("{mount_path}/");
        router = router.route("/", get(move || redirect(page_path.clone(), false)));
    }
    router.merge(dashboard_router(dashboard, mount_path))
}

async fn redirect(target: String, permanent: bool) -> Redirect {
    if permanent {
        Redirect::permanent(&target)
    } else {
        Redirect::temporary(&target)
    }
}

async fn serve_page(State(dashboard): State<Arc<Dashboard>>) -> Html<String> {
    Html(dashboard.html().to_string())
}

fn css(body: &'static str) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], body)
}

/// Build the dashboard, bind, and serve until Ctrl+C.
pub async fn serve(config: DashConfig) -> Result<()> {
    let dashboard = Arc::new(Dashboard::build(&config)?);
    let mount_path = config.mount_path();
    let app = host_router(dashboard, &mount_path);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    log::info!("Serving dashboard at http://{}{}/", config.bind, mount_path);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    use super::*;
    use crate::classifier::ModelArtifact;
    use crate::data::model::{CellValue, ClinicalDataset};

    fn dashboard() -> Arc<Dashboard> {
        let ds = ClinicalDataset::from_rows(
            vec!["Age".into(), "Polyuria".into(), "class".into()],
            vec![
                vec![CellValue::Integer(40), CellValue::Bool(true), CellValue::Bool(true)],
                vec![CellValue::Integer(52), CellValue::Bool(false), CellValue::Bool(false)],
            ],
        )
        .unwrap();
        let model = ModelArtifact {
            model_type: "random_forest".into(),
            n_estimators: None,
            feature_names: None,
            feature_importances: vec![0.4, 0.6],
        };
        Arc::new(Dashboard::from_parts(&ds, &model, &DashConfig::default()).unwrap())
    }

    async fn get_raw(app: Router, path: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn page_is_served_under_prefix() {
        let response = get_raw(host_router(dashboard(), "/dashapp"), "/dashapp/").await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("text/html"));
        assert!(response.contains("Feature Heatmap"));
        assert!(response.contains("database-table"));
    }

    #[tokio::test]
    async fn bare_prefix_and_root_redirect() {
        let response = get_raw(host_router(dashboard(), "/dashapp"), "/dashapp").await;
        assert!(response.starts_with("HTTP/1.1 308"));
        assert!(response.contains("location: /dashapp/"));

        let response = get_raw(host_router(dashboard(), "/dashapp"), "/").await;
        assert!(response.starts_with("HTTP/1.1 307"));
    }

    #[tokio::test]
    async fn other_paths_are_not_found() {
        let response = get_raw(host_router(dashboard(), "/dashapp"), "/dashapp/data.json").await;
        assert!(response.starts_with("HTTP/1.1 404"));
    }

    #[tokio::test]
    async fn stylesheets_are_served() {
        let response = get_raw(host_router(dashboard(), "/dashapp"), "/static/dashstyles.css").await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("text/css"));
        assert!(response.contains(".dash-graph"));
    }

    #[tokio::test]
    async fn root_mount_serves_page_at_slash() {
        let response = get_raw(host_router(dashboard(), ""), "/").await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("Age Distribution"));
    }
}

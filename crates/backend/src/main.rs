mod assets;
mod config;
mod graphql;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::http::HeaderValue;
use axum::{extract::State, response::Html, routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use config::ServerConfig;
use graphql::Schema;

async fn graphql_handler(State(schema): State<Schema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> Html<String> {
    Html(
        async_graphql::http::GraphiQLSource::build()
            .endpoint("/graphql")
            .finish(),
    )
}

/// Build a cache-controlled static file router.
///
/// Separated so tests can exercise the caching layer with arbitrary directories.
fn cached_static_router(dir: &Path, cache_header: &'static str) -> Router {
    let layer = SetResponseHeaderLayer::overriding(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(cache_header),
    );
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(layer)
}

const CACHE_1DAY: &str = "public, max-age=86400, must-revalidate";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Build the full application router.
fn build_app(schema: Schema, config: &ServerConfig) -> Router {
    // Static file routers are stateless, merge them before adding app state
    let static_files = Router::new()
        .nest(
            "/static",
            cached_static_router(&config.assets_dir, CACHE_1DAY),
        )
        .nest(
            "/dist",
            cached_static_router(&config.dist_dir, CACHE_IMMUTABLE),
        )
        .nest(
            "/assets",
            cached_static_router(&config.dist_dir.join("assets"), CACHE_IMMUTABLE),
        );

    let index_path = config.dist_dir.join("index.html");

    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .route("/", get(move || serve_index(index_path.clone())))
        .with_state(schema)
        .merge(static_files)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid server configuration");
            std::process::exit(1);
        }
    };

    let loaded_assets = match assets::Assets::load(&config.assets_dir) {
        Ok(assets) => Arc::new(assets),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load map data");
            std::process::exit(1);
        }
    };

    let schema = graphql::build_schema(loaded_assets);
    let app = build_app(schema, &config);

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!("Server running at http://localhost:{}", config.port);
    tracing::info!("GraphiQL playground at http://localhost:{}/graphql", config.port);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server stopped");
        std::process::exit(1);
    }
}

async fn serve_index(index_path: PathBuf) -> Html<String> {
    // Try to serve the built frontend, fall back to a simple message
    match tokio::fs::read_to_string(&index_path).await {
        Ok(html) => Html(html),
        Err(_) => Html(
            r#"<!DOCTYPE html>
<html>
<head><title>Pin Map</title></head>
<body>
<h1>Pin Map</h1>
<p>Frontend not built yet. Visit <a href="/graphql">GraphiQL</a> to explore the API.</p>
</body>
</html>"#
                .to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode};
    use tower::ServiceExt;

    /// Directories standing in for ASSETS_DIR and DIST_DIR.
    struct Dirs {
        assets: tempfile::TempDir,
        dist: tempfile::TempDir,
    }

    impl Dirs {
        fn new() -> Self {
            let assets = tempfile::tempdir().unwrap();
            let dist = tempfile::tempdir().unwrap();
            std::fs::write(assets.path().join("map_data.json"), "{}").unwrap();
            std::fs::create_dir(dist.path().join("assets")).unwrap();
            Dirs { assets, dist }
        }

        fn with_asset(self, name: &str, content: &str) -> Self {
            std::fs::write(self.assets.path().join(name), content).unwrap();
            self
        }

        fn with_dist(self, name: &str, content: &str) -> Self {
            std::fs::write(self.dist.path().join(name), content).unwrap();
            self
        }

        fn app(&self) -> Router {
            let config = ServerConfig {
                assets_dir: self.assets.path().to_path_buf(),
                dist_dir: self.dist.path().to_path_buf(),
                port: 0,
            };
            let schema = graphql::build_schema(Arc::new(assets::tests::sample_assets()));
            build_app(schema, &config)
        }
    }

    async fn get(app: Router, uri: &str) -> Response<Body> {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(resp: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn cache_control(resp: &Response<Body>) -> &str {
        resp.headers()
            .get("cache-control")
            .unwrap()
            .to_str()
            .unwrap()
    }

    #[tokio::test]
    async fn test_static_assets_have_1day_cache() {
        let dirs = Dirs::new().with_asset("photo.jpg", "jpeg");
        let resp = get(dirs.app(), "/static/map_data.json").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(cache_control(&resp), CACHE_1DAY);

        let resp = get(dirs.app(), "/static/photo.jpg").await;
        assert_eq!(cache_control(&resp), CACHE_1DAY);
    }

    #[tokio::test]
    async fn test_frontend_bundles_have_immutable_cache() {
        let dirs = Dirs::new().with_dist("app-abc123.js", "bundle()");
        std::fs::write(dirs.dist.path().join("assets/style-xyz.css"), "body{}").unwrap();

        let bundle = get(dirs.app(), "/dist/app-abc123.js").await;
        assert_eq!(bundle.status(), StatusCode::OK);
        assert_eq!(cache_control(&bundle), CACHE_IMMUTABLE);

        let style = get(dirs.app(), "/assets/style-xyz.css").await;
        assert_eq!(style.status(), StatusCode::OK);
        assert_eq!(cache_control(&style), CACHE_IMMUTABLE);
    }

    #[tokio::test]
    async fn test_missing_static_file_returns_404() {
        let dirs = Dirs::new();
        let resp = get(dirs.app(), "/static/nonexistent.txt").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_graphql_endpoint_serves_map_data() {
        let dirs = Dirs::new();
        let resp = dirs
            .app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/graphql")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"query":"{ pinCount mapViews { name } }"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(json["data"]["pinCount"], 1);
        assert_eq!(json["data"]["mapViews"][0]["name"], "Terrain");
    }

    #[tokio::test]
    async fn test_index_served_from_dist_dir() {
        let dirs = Dirs::new().with_dist("index.html", "<html>pinmap</html>");
        let resp = get(dirs.app(), "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "<html>pinmap</html>");
    }

    #[tokio::test]
    async fn test_index_fallback_when_frontend_missing() {
        let dirs = Dirs::new();
        let resp = get(dirs.app(), "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("Frontend not built yet"));
    }
}

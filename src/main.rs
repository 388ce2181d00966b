use axum::{extract::State, routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use estate_api::auth::sessions::SessionStore;
use estate_api::config::{self, AppConfig};
use estate_api::files::FileIntake;
use estate_api::state::AppState;
use estate_api::store::models::user::User;
use estate_api::store::{self, Store, StoreError};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, ESTATE_API_PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting estate API in {:?} mode", config.environment);

    let store = match store::from_config(&config.database).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("failed to initialize store: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = seed_admin(store.as_ref(), config).await {
        tracing::warn!("admin seeding failed: {}", e);
    }

    let state = AppState {
        store,
        sessions: SessionStore::new(),
        files: FileIntake::new(&config.uploads.dir),
    };

    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("Estate API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public service endpoints
        .route("/", get(root))
        .route("/health", get(health))
        // API routes
        .merge(auth_routes())
        .merge(estate_routes())
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use axum::routing::post;
    use estate_api::handlers::auth;

    Router::new()
        .route("/api/login", post(auth::session_login))
        .route("/api/logout", post(auth::session_logout))
        .route("/api/check-auth", get(auth::session_check))
}

fn estate_routes() -> Router<AppState> {
    use estate_api::handlers::estates;

    Router::new()
        // Collection-level operations
        .route(
            "/api/digital-estates",
            get(estates::collection_get).post(estates::collection_post),
        )
        // Record-level operations
        .route(
            "/api/digital-estates/:id",
            get(estates::record_get)
                .put(estates::record_put)
                .delete(estates::record_delete),
        )
}

/// Seed the configured admin user so a fresh deployment can log in. Skipped
/// when no password is configured or the user already exists.
async fn seed_admin(store: &dyn Store, config: &AppConfig) -> Result<(), StoreError> {
    let Some(password) = &config.admin.password else {
        return Ok(());
    };

    if store.find_user(&config.admin.username).await?.is_some() {
        return Ok(());
    }

    store
        .insert_user(User::create(&config.admin.username, password))
        .await?;
    tracing::info!("Seeded admin user '{}'", config.admin.username);
    Ok(())
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Estate API",
        "version": version,
        "description": "REST backend for digital estate records",
        "endpoints": {
            "login": "POST /api/login",
            "logout": "POST /api/logout",
            "check_auth": "GET /api/check-auth",
            "estates": "GET|POST /api/digital-estates",
            "estate": "GET|PUT|DELETE /api/digital-estates/:id",
            "health": "GET /health",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "store_error": e.to_string()
            })),
        ),
    }
}

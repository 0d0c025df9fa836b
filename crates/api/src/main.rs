use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use linemill_api::config::ServerConfig;
use linemill_api::routes;
use linemill_api::state::AppState;
use linemill_cache::RedisProgressCache;
use linemill_db::PgJobStore;
use linemill_pipeline::{task_queue, WorkerPool};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linemill=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = linemill_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    linemill_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    linemill_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Progress cache ---
    let cache = RedisProgressCache::connect(&config.redis_url)
        .await
        .expect("Failed to connect to Redis");
    tracing::info!(url = %config.redis_url, "Progress cache connected");

    // --- Upload staging directory ---
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .expect("Failed to create upload directory");

    // --- Task queue and worker pool ---
    let store = Arc::new(PgJobStore::new(pool));
    let cache = Arc::new(cache);
    let (queue_tx, queue_rx) = task_queue(config.queue_depth);
    let _workers = WorkerPool::spawn(config.workers, queue_rx, store.clone(), cache.clone());
    tracing::info!(workers = config.workers, queue_depth = config.queue_depth, "Worker pool started");

    // --- App state ---
    let state = AppState {
        store,
        cache,
        queue: queue_tx,
        config: Arc::new(config.clone()),
    };

    // --- Router ---
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::new(config.host.parse().expect("Invalid HOST"), config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

use booking_server::config::ServerConfig;
use booking_server::store::{MemoryStore, load_seed};
use booking_server::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("booking_server=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env();
    let store = MemoryStore::new();

    match &config.seed_file {
        Some(path) => {
            let summary = load_seed(path, &store)
                .await
                .expect("Failed to load seed file");
            info!(
                path = %path.display(),
                stations = summary.stations,
                trains = summary.trains,
                users = summary.users,
                routes = summary.routes,
                stops = summary.stops,
                "seed data loaded"
            );
        }
        None => warn!("BOOKING_SEED_FILE not set, starting with an empty store"),
    }

    let state = AppState::new(store, config.search.clone(), &config.name_cache);
    let app = create_router(state);

    info!(addr = %config.bind_addr, "booking server listening");
    info!("API endpoints:");
    info!("  GET    /health");
    info!("  GET    /api/train-schedule?page=&limit=");
    info!("  POST   /api/train-schedule/find");
    info!("  GET    /api/train-schedule/train/:train_id");
    info!("  GET    /api/train-schedule/train/:train_id/station/:station_id");
    info!("  GET    /api/train-schedule/station/:station_id");
    info!("  GET    /api/train-schedule/stop/:stop_id");
    info!("  POST   /api/ticket");
    info!("  POST   /api/ticket/get");
    info!("  GET    /api/ticket/user/:user_id");
    info!("  GET    /api/ticket/:ticket_id");
    info!("  PATCH  /api/ticket/:ticket_id");
    info!("  DELETE /api/ticket/:ticket_id");

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}

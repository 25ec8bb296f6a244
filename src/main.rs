// region:    --- Imports
use axum::routing::{get, post};
use axum::Router;
use sharing_service::database::DatabaseManager;
use sharing_service::handlers;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let db_manager = Arc::new(DatabaseManager::new().await);

    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> schema initialization failed: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> schema ready", "Main");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes_all = Router::new()
        .route("/users", get(handlers::get_users).post(handlers::create_user))
        .route(
            "/users/:id",
            get(handlers::get_user)
                .patch(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/items", get(handlers::get_items).post(handlers::create_item))
        .route("/items/search", get(handlers::search_items))
        .route(
            "/items/:id",
            get(handlers::get_item).patch(handlers::update_item),
        )
        .route("/items/:id/comment", post(handlers::add_comment))
        .route(
            "/bookings",
            get(handlers::get_bookings).post(handlers::create_booking),
        )
        .route("/bookings/owner", get(handlers::get_owner_bookings))
        .route(
            "/bookings/:id",
            get(handlers::get_booking).patch(handlers::approve_booking),
        )
        .route(
            "/requests",
            get(handlers::get_own_requests).post(handlers::create_request),
        )
        .route("/requests/all", get(handlers::get_other_requests))
        .route("/requests/:id", get(handlers::get_request))
        .layer(cors)
        .with_state(db_manager);

    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main

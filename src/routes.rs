use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::handlers::api::{
    create_listing, create_session, preview_listing, send_contact_request, update_listing,
    AppState,
};
use crate::handlers::test::{health_check, sample_listings};

pub fn create_router(app_state: Arc<AppState>, is_production: bool) -> Router {
    let mut router = Router::new();

    // Health check is always available
    let health_route = Router::new().route("/health", get(health_check));
    router = router.merge(health_route);

    // Session, listing and request routes are always available
    let listing_routes = Router::new()
        .route("/sessions", post(create_session))
        .route("/listings", post(create_listing))
        .route("/listings/:listing_id", put(update_listing))
        .route("/:module/:listing_id/requests", post(send_contact_request));
    router = router.merge(listing_routes);

    // Only add development helpers if not in production mode
    if !is_production {
        let dev_routes = Router::new()
            .route("/listings/preview", post(preview_listing))
            .route("/listings/samples", get(sample_listings));

        router = router.merge(dev_routes);

        info!("Development routes enabled - server running in development mode");
    } else {
        info!("Running in production mode - development helpers disabled");
    }

    router.with_state(app_state)
}

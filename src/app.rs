use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers;
use crate::state::AppState;

/// Build the full HTTP application around a shared state.
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .merge(auth_public_routes())
        .merge(auth_routes(state.clone()));

    if state.config.debug.expose_users {
        tracing::warn!("Debug user listing enabled at GET /users");
        router = router.merge(debug_routes());
    }

    // Landing page and other static assets
    let static_files = ServeDir::new(&state.config.server.static_dir);

    router
        .fallback_service(static_files)
        .layer(cors_layer(&state.config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/signup", post(auth::signup_post))
        .route("/signin", post(auth::signin_post))
}

fn auth_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::auth;

    Router::new()
        .route("/me", get(auth::me_get))
        .route_layer(middleware::from_fn_with_state(state, crate::middleware::session_middleware))
}

fn debug_routes() -> Router<AppState> {
    Router::new().route("/users", get(handlers::debug::users_get))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

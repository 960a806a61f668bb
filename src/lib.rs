pub mod config;
pub mod modules;
pub mod services;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use config::{Config, DbPool};
use modules::exercise::{crud::ExerciseCrud, exercise_routes, interface::LogRepository};
use modules::trophy::{crud::TrophyCrud, interface::TrophyRepository, trophy_routes};
use modules::user::{crud::UserCrud, interface::UserRepository, user_routes};
use services::jwt::{require_auth, JwtService};
use services::trophy::{EvaluatorError, HttpTrophyEvaluator, TrophyEvaluator, TrophyReconciler};

pub struct AppState {
    pub config: Config,
    pub logs: Arc<dyn LogRepository>,
    pub trophies: Arc<dyn TrophyRepository>,
    pub users: Arc<dyn UserRepository>,
    pub evaluator: Arc<dyn TrophyEvaluator>,
    pub jwt_service: JwtService,
}

impl AppState {
    /// State backed by MySQL and the HTTP trophy evaluator.
    pub fn new(config: Config, db: DbPool) -> Result<Self, EvaluatorError> {
        let evaluator = HttpTrophyEvaluator::new(&config.evaluator_url, config.evaluator_timeout)?;
        let jwt_service = JwtService::new(config.jwt_secret.clone());

        Ok(Self {
            logs: Arc::new(ExerciseCrud::new(db.clone())),
            trophies: Arc::new(TrophyCrud::new(db.clone())),
            users: Arc::new(UserCrud::new(db)),
            evaluator: Arc::new(evaluator),
            jwt_service,
            config,
        })
    }

    pub fn reconciler(&self) -> TrophyReconciler<'_> {
        TrophyReconciler::new(
            self.trophies.as_ref(),
            self.users.as_ref(),
            self.evaluator.as_ref(),
        )
    }
}

pub fn create_app(state: AppState) -> Router {
    let state = Arc::new(state);
    let cors = cors_layer(&state.config);

    let protected = Router::new()
        .merge(exercise_routes())
        .merge(trophy_routes())
        .merge(user_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(protected)
        .layer(RequestBodyLimitLayer::new(1024 * 100)) // 100KB max body
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    match HeaderValue::from_str(&config.frontend_url) {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!("FRONTEND_URL is not a valid origin, cross-origin requests are disabled");
            layer
        }
    }
}

async fn root() -> &'static str {
    "Chainsaw API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

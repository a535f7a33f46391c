pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::auth::handlers as auth;
use crate::pdf::handlers as pdf;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth API
        .route("/api/v1/auth/register", post(auth::handle_register))
        .route("/api/v1/auth/login", post(auth::handle_login))
        // Resume CRUD API
        .route("/api/v1/resumes", post(resumes::handle_create_resume))
        .route("/api/v1/resumes", get(resumes::handle_list_resumes))
        .route("/api/v1/resumes/:id", put(resumes::handle_update_resume))
        .route("/api/v1/resumes/:id", get(resumes::handle_get_resume))
        .route(
            "/api/v1/resumes/:id",
            delete(resumes::handle_delete_resume),
        )
        .route("/api/v1/resumes/render-pdf", post(pdf::handle_render_pdf))
        // ATS / AI analysis API
        .route("/api/v1/ats/evaluate", post(analysis::handle_evaluate))
        .route("/api/v1/ai/analyze-resume", post(analysis::handle_analyze))
        .route(
            "/api/v1/ai/improve-resume",
            post(analysis::handle_improve_resume),
        )
        .route(
            "/api/v1/ai/improve-uploaded-resume",
            post(analysis::handle_improve_uploaded),
        )
        .route(
            "/api/v1/ai/implement-improvements",
            post(analysis::handle_implement),
        )
        .route(
            "/api/v1/ai/implement-uploaded-improvements",
            post(analysis::handle_implement_uploaded),
        )
        .with_state(state)
}

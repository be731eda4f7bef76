pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::analytics::handlers as analytics;
use crate::postings::handlers as postings;
use crate::render::handlers as render;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;
use crate::tracker::handlers as tracker;
use crate::versions::handlers as versions;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health_handler))
        .route("/health", get(health::health_handler))
        // Tailoring
        .route("/rewrite", post(tailoring::handle_rewrite))
        .route("/ats_score", post(tailoring::handle_ats_score))
        .route("/detect_ai", post(tailoring::handle_detect_ai))
        .route(
            "/generate_cover_letter",
            post(tailoring::handle_generate_cover_letter),
        )
        .route("/generate_outreach", post(tailoring::handle_generate_outreach))
        .route("/generate_linkedin", post(tailoring::handle_generate_linkedin))
        // Rendering
        .route("/render", post(render::handle_render))
        .route(
            "/render_cover_letter_pdf",
            post(render::handle_render_cover_letter_pdf),
        )
        // Tracker
        .route(
            "/applications",
            get(tracker::handle_list_applications).post(tracker::handle_add_application),
        )
        .route(
            "/applications/:id",
            patch(tracker::handle_update_status).delete(tracker::handle_delete_application),
        )
        // Versions
        .route(
            "/versions",
            get(versions::handle_list_versions).post(versions::handle_save_version),
        )
        .route(
            "/versions/:name",
            get(versions::handle_get_version).delete(versions::handle_delete_version),
        )
        // Analytics & scraping
        .route("/analytics", get(analytics::handle_analytics))
        .route("/scrape-job", post(postings::handle_scrape_job))
        .with_state(state)
}

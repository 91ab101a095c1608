/*
 * Responsibility
 * - GET /dashboard
 * - AuthCtx の email で挨拶を組み立てるだけ (数値はモック)
 */
use axum::Json;
use chrono::Utc;

use crate::api::dto::dashboard::DashboardResponse;
use crate::api::extractors::AuthCtxExtractor;

pub async fn dashboard(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<DashboardResponse> {
    tracing::debug!(user_id = ctx.user_id, email = %ctx.email, "dashboard requested");

    Json(DashboardResponse {
        message: format!(
            "Welcome back, {}! Here's your personalized fitness overview.",
            ctx.email
        ),
        user_name: ctx.email,
        progress: "You've achieved 10% of your weight loss goal and improved endurance by 15%."
            .to_string(),
        last_update: Utc::now().format("%b %d, %Y %H:%M:%S UTC").to_string(),
    })
}

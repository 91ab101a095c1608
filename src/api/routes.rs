/*
 * Responsibility
 * - /api の URL 構造を定義
 * - public (/register, /login) と protected subtree の分割
 * - Bearer が必要な範囲はここで access middleware を適用する
 */
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::api::handlers::{
    auth::{login, register},
    dashboard::dashboard,
    plans::{current_plan, generate_plan},
    uploads::upload,
};
use crate::middleware;
use crate::state::AppState;

// Multipart uploads may carry up to 10 MB; JSON routes keep the default cap.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login));

    let protected = Router::new()
        .route("/dashboard", get(dashboard))
        .route(
            "/upload",
            post(upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/generate-plan", post(generate_plan))
        .route("/plan", get(current_plan));
    let protected = middleware::auth::access::apply(protected, state);

    public.merge(protected)
}

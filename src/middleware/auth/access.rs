//! Bearer token 検証 → AuthCtx を extensions に入れる
//!
//! Per-request state machine, terminal ACCEPT/REJECT:
//! 1. `Authorization` ヘッダ抽出（なければ 401）
//! 2. scheme parse: ちょうど 2 token、先頭は case-insensitive "Bearer"
//! 3. 署名 + 登録 claim 検証（HS256 固定; expiry もここ）
//! 4. strict claim check（identity が壊れていれば 401）
//! 5. 成功時のみ AuthCtx を request extensions に載せて next へ
//!
//! No state is shared across requests; the outcome is a pure function of
//! (header, secret, clock).

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::jwt::TokenError;
use crate::state::AppState;

/// 保護対象の subtree に認証を掛けるための middleware を適用する。
///
/// 例：
/// ```ignore
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized("Authorization header missing"))?;

    // Expecting exactly "Bearer <token>".
    let parts: Vec<&str> = auth.split(' ').collect();
    let token = match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => *token,
        _ => return Err(AppError::Unauthorized("Invalid Authorization header format")),
    };

    let verified = match state.auth.verify_strict(token) {
        Ok(verified) => verified,
        Err(err) => {
            tracing::warn!(
                error = %err,
                "access token verification failed"
            );
            return Err(AppError::Unauthorized(reject_message(&err)));
        }
    };

    let auth_ctx = AuthCtx::new(verified.user_id, verified.email);

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}

fn reject_message(err: &TokenError) -> &'static str {
    if err.is_signature_mismatch() {
        "Invalid token signature"
    } else if err.is_claim_failure() {
        "Invalid token"
    } else {
        "Invalid or expired token"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::{Json, Router, body::to_bytes, http::StatusCode, routing::get};
    use serde_json::{Value, json};
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::ServiceExt;

    use crate::api::extractors::AuthCtxExtractor;
    use crate::services::auth::TokenService;

    const SECRET: &str = "test-secret";

    async fn test_state() -> AppState {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        AppState::new(
            pool,
            Arc::new(TokenService::new(SECRET)),
            Arc::new(PathBuf::from(".")),
        )
    }

    async fn whoami(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<Value> {
        Json(json!({ "user_id": ctx.user_id, "email": ctx.email }))
    }

    async fn protected_app() -> (AppState, Router) {
        let state = test_state().await;
        let router = Router::new().route("/whoami", get(whoami));
        let router = apply(router, state.clone()).with_state(state.clone());
        (state, router)
    }

    async fn send(router: Router, auth_header: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = auth_header {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let response = router
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let (_state, app) = protected_app().await;
        let (status, body) = send(app, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Authorization header missing");
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected() {
        let (_state, app) = protected_app().await;
        let (status, body) = send(app, Some("Basic xyz")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid Authorization header format");
    }

    #[tokio::test]
    async fn extra_tokens_are_rejected() {
        let (state, app) = protected_app().await;
        let token = state.auth.issue(7, "a@x.com").unwrap();
        let (status, body) = send(app, Some(&format!("Bearer {} extra", token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid Authorization header format");
    }

    #[tokio::test]
    async fn valid_token_reaches_the_handler_with_its_identity() {
        let (state, app) = protected_app().await;
        let token = state.auth.issue(7, "a@x.com").unwrap();
        let (status, body) = send(app, Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_id"], 7);
        assert_eq!(body["email"], "a@x.com");
    }

    #[tokio::test]
    async fn scheme_is_case_insensitive() {
        let (state, app) = protected_app().await;
        let token = state.auth.issue(7, "a@x.com").unwrap();
        let (status, _body) = send(app, Some(&format!("bearer {}", token))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn foreign_secret_is_a_signature_rejection() {
        let (_state, app) = protected_app().await;
        let token = TokenService::new("some-other-secret")
            .issue(7, "a@x.com")
            .unwrap();
        let (status, body) = send(app, Some(&format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid token signature");
    }

    #[tokio::test]
    async fn garbage_token_is_invalid_or_expired() {
        let (_state, app) = protected_app().await;
        let (status, body) = send(app, Some("Bearer not-a-jwt")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid or expired token");
    }
}

/*
 * Responsibility
 * - POST /register, POST /login
 * - DTO validation → password hasher / user_repo / token issuer の組み合わせ
 * - 認証失敗の文言は「存在しない user」と「password 不一致」で揃える (enumeration 対策)
 */
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;

use crate::api::dto::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::error::AppError;
use crate::repos::error::RepoError;
use crate::repos::user_repo;
use crate::services::auth::password;
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let Json(req) = payload.map_err(|_| AppError::bad_request("Invalid request payload"))?;
    req.validate().map_err(AppError::bad_request)?;

    let password_hash = password::hash(&req.password).map_err(|err| {
        tracing::error!(error = %err, "password hashing failed");
        AppError::Internal("Error hashing password")
    })?;

    let user_id = user_repo::insert(&state.db, &req.email, &password_hash)
        .await
        .map_err(|err| match err {
            RepoError::Conflict => AppError::Conflict("User with this email already exists"),
            RepoError::Db(e) => {
                tracing::error!(error = %e, "user insert failed");
                AppError::Internal("Error registering user")
            }
        })?;

    tracing::info!(user_id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully",
            user_id,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(req) = payload.map_err(|_| AppError::bad_request("Invalid request payload"))?;
    req.validate().map_err(AppError::bad_request)?;

    let user = user_repo::find_by_email(&state.db, &req.email)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "user lookup failed");
            AppError::Internal("Server error during login")
        })?
        // Same wording as a password mismatch: do not reveal which part failed.
        .ok_or(AppError::Unauthorized("Invalid credentials"))?;

    let valid = password::verify(&user.password_hash, &req.password).unwrap_or_else(|err| {
        // A stored digest that bcrypt cannot parse. Treat as a mismatch.
        tracing::warn!(user_id = user.id, error = %err, "stored password hash is malformed");
        false
    });

    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials"));
    }

    let token = state.auth.issue(user.id, &user.email).map_err(|err| {
        tracing::error!(error = %err, "token issuance failed");
        AppError::Internal("Error generating token")
    })?;

    Ok(Json(LoginResponse {
        token,
        email: user.email,
    }))
}

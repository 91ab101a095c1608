/*
 * Responsibility
 * - POST /generate-plan, GET /plan
 * - プラン本文はモック (AI 連携なし、永続化なし)
 */
use axum::Json;
use axum::extract::rejection::JsonRejection;

use crate::api::dto::plans::{FitnessPlan, PlanGenerationRequest, PlansResponse};
use crate::api::extractors::AuthCtxExtractor;
use crate::error::AppError;

pub async fn generate_plan(
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    payload: Result<Json<PlanGenerationRequest>, JsonRejection>,
) -> Result<Json<PlansResponse>, AppError> {
    let Json(req) =
        payload.map_err(|_| AppError::bad_request("Invalid request for plan generation"))?;

    tracing::info!(user_id = ctx.user_id, prompt = %req.user_prompt, "plan generation requested");

    let diet = FitnessPlan {
        plan_type: "Diet",
        title: "Personalized AI Diet Plan",
        description: format!(
            "Based on your goals '{}', your AI-powered diet plan focuses on balanced nutrition. \
             Include 1800-2000 calories, high protein, complex carbs, and healthy fats. \
             Emphasize lean meats, vegetables, fruits, and whole grains. \
             Drink at least 3 liters of water daily.",
            req.user_prompt
        ),
    };
    let workout = FitnessPlan {
        plan_type: "Workout",
        title: "Personalized AI Workout Routine",
        description: format!(
            "Considering your request '{}', your AI-driven workout plan includes 3 days of \
             strength training (full body) and 2 days of cardio (HIIT or steady-state). \
             Ensure proper warm-up and cool-down. Include warm-up and cool-down stretches.",
            req.user_prompt
        ),
    };

    Ok(Json(PlansResponse {
        plans: vec![diet, workout],
    }))
}

pub async fn current_plan(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<PlansResponse> {
    tracing::debug!(user_id = ctx.user_id, "current plan requested");

    let diet = FitnessPlan {
        plan_type: "Diet",
        title: "Your Current Diet Plan",
        description: "Continue with your balanced diet of lean proteins, fresh vegetables, and \
                      whole grains. Remember portion control and adequate hydration."
            .to_string(),
    };
    let workout = FitnessPlan {
        plan_type: "Workout",
        title: "Your Current Workout Plan",
        description: "Maintain your 4-day-a-week workout schedule, alternating between upper body \
                      and lower body strength training, with active recovery on rest days."
            .to_string(),
    };

    Json(PlansResponse {
        plans: vec![diet, workout],
    })
}

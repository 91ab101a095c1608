/*
 * Responsibility
 * - plan 生成/取得の request/response DTO
 */
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PlanGenerationRequest {
    pub user_prompt: String,
}

#[derive(Debug, Serialize)]
pub struct FitnessPlan {
    #[serde(rename = "type")]
    pub plan_type: &'static str,
    pub title: &'static str,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct PlansResponse {
    pub plans: Vec<FitnessPlan>,
}

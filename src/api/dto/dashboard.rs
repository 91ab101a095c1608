use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub message: String,
    pub user_name: String,
    pub progress: String,
    pub last_update: String,
}

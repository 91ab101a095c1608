/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::path::PathBuf;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::services::auth::TokenService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: SqlitePool,
    pub auth: Arc<TokenService>,
    pub upload_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(db: SqlitePool, auth: Arc<TokenService>, upload_dir: Arc<PathBuf>) -> Self {
        Self {
            db,
            auth,
            upload_dir,
        }
    }
}

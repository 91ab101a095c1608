/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは middleware/services 側の責務
 * - リクエスト 1 回分のライフタイムに閉じる。永続化しない、リクエスト間で共有しない
 */

/// 認証済みのリクエストに付与されるコンテキスト
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub user_id: i64,
    pub email: String,
}

impl AuthCtx {
    pub fn new(user_id: i64, email: String) -> Self {
        Self { user_id, email }
    }
}

/*
 * Responsibility
 * - users テーブルの読み取り (このサービスは書き込まない)
 * - 行を UserRecord に詰め替えて auth 層に渡す
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;
use crate::services::auth::context::UserRecord;

#[derive(FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub passwd: String,
    pub salt: String,
    pub role_id: Option<String>,
    pub center_id: Option<i64>,
    pub tenant_id: Option<i64>,
    pub group_id: Option<i64>,
    pub part_id: Option<i64>,
    pub email: String,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            password_hash: row.passwd,
            password_salt: row.salt,
            role_id: row.role_id,
            center_id: row.center_id,
            tenant_id: row.tenant_id,
            group_id: row.group_id,
            part_id: row.part_id,
            email: row.email,
        }
    }
}

#[derive(Clone, Debug)]
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id,
                name,
                passwd,
                salt,
                role_id,
                center_id,
                tenant_id,
                group_id,
                part_id,
                email
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

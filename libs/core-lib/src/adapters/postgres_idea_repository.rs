use crate::domain::idea::{Comment, Idea};
use crate::domain::user::UserSummary;
use crate::{CoreError, IdeaRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, warn};

// Namespace half of the two-key advisory lock; the tenant id is the other half.
const IDEA_NUMBER_LOCK: i32 = 0x1DEA;

// Idea joined with its author, matching the column aliases used below
#[derive(sqlx::FromRow, Debug)]
struct IdeaRow {
    id: i32,
    number: i32,
    title: String,
    description: String,
    created_on: DateTime<Utc>,
    user_id: i32,
    user_name: String,
    user_email: String,
}

impl From<IdeaRow> for Idea {
    fn from(row: IdeaRow) -> Self {
        Idea {
            id: row.id,
            number: row.number,
            title: row.title,
            description: row.description,
            created_on: row.created_on,
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
        }
    }
}

#[derive(sqlx::FromRow, Debug)]
struct CommentRow {
    id: i32,
    content: String,
    created_on: DateTime<Utc>,
    user_id: i32,
    user_name: String,
    user_email: String,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            content: row.content,
            created_on: row.created_on,
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
        }
    }
}

const SELECT_IDEA: &str = r#"
    SELECT i.id, i.number, i.title, i.description, i.created_on,
           u.id AS user_id, u.name AS user_name, u.email AS user_email
    FROM ideas i
    INNER JOIN users u
    ON u.id = i.user_id
"#;

// A dangling idea, user or tenant id is reported like any other missing record
fn missing_reference(err: sqlx::Error, what: String) -> CoreError {
    if err
        .as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation())
    {
        CoreError::NotFound(what)
    } else {
        CoreError::infrastructure(err)
    }
}

/// PostgreSQL implementation of the IdeaRepository port using sqlx.
#[derive(Debug, Clone)]
pub struct PostgresIdeaRepository {
    pool: PgPool,
}

impl PostgresIdeaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_idea(
        &self,
        filter: &str,
        tenant_id: i32,
        key: i32,
        what: &str,
    ) -> Result<Idea, CoreError> {
        let query = format!("{SELECT_IDEA} WHERE i.tenant_id = $1 AND {filter}");
        let row: Option<IdeaRow> = sqlx::query_as(&query)
            .bind(tenant_id)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(CoreError::infrastructure)?;

        row.map(Idea::from)
            .ok_or_else(|| CoreError::NotFound(format!("idea {what} {key} in tenant {tenant_id}")))
    }

    // Runs inside the caller's transaction; the advisory lock is released on commit/rollback.
    async fn insert_idea(
        conn: &mut PgConnection,
        tenant_id: i32,
        user_id: i32,
        title: &str,
        description: &str,
    ) -> Result<Idea, CoreError> {
        sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
            .bind(IDEA_NUMBER_LOCK)
            .bind(tenant_id)
            .execute(&mut *conn)
            .await
            .map_err(CoreError::infrastructure)?;

        let row: Option<IdeaRow> = sqlx::query_as(
            r#"
            WITH inserted AS (
                INSERT INTO ideas (title, number, description, tenant_id, user_id, created_on)
                VALUES ($1, (SELECT COALESCE(MAX(number), 0) + 1 FROM ideas WHERE tenant_id = $3), $2, $3, $4, $5)
                RETURNING id, number, title, description, created_on, user_id
            )
            SELECT i.id, i.number, i.title, i.description, i.created_on,
                   u.id AS user_id, u.name AS user_name, u.email AS user_email
            FROM inserted i
            INNER JOIN users u
            ON u.id = i.user_id AND u.tenant_id = $3
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(tenant_id)
        .bind(user_id)
        .bind(Utc::now())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| missing_reference(e, format!("user {user_id} in tenant {tenant_id}")))?;

        // The insert went through but the author is not part of this tenant
        row.map(Idea::from)
            .ok_or_else(|| CoreError::NotFound(format!("user {user_id} in tenant {tenant_id}")))
    }
}

#[async_trait]
impl IdeaRepository for PostgresIdeaRepository {
    async fn list_ideas(&self, tenant_id: i32) -> Result<Vec<Idea>, CoreError> {
        let query = format!("{SELECT_IDEA} WHERE i.tenant_id = $1 ORDER BY i.created_on DESC, i.id DESC");
        let rows: Vec<IdeaRow> = sqlx::query_as(&query)
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await
            .map_err(CoreError::infrastructure)?;

        Ok(rows.into_iter().map(Idea::from).collect())
    }

    async fn get_idea(&self, tenant_id: i32, idea_id: i32) -> Result<Idea, CoreError> {
        self.fetch_one_idea("i.id = $2", tenant_id, idea_id, "id")
            .await
    }

    async fn get_idea_by_number(&self, tenant_id: i32, number: i32) -> Result<Idea, CoreError> {
        self.fetch_one_idea("i.number = $2", tenant_id, number, "number")
            .await
    }

    async fn list_comments(&self, tenant_id: i32, idea_id: i32) -> Result<Vec<Comment>, CoreError> {
        let rows: Vec<CommentRow> = sqlx::query_as(
            r#"
            SELECT c.id, c.content, c.created_on,
                   u.id AS user_id, u.name AS user_name, u.email AS user_email
            FROM comments c
            INNER JOIN ideas i
            ON i.id = c.idea_id
            INNER JOIN users u
            ON u.id = c.user_id
            WHERE i.id = $1
            AND i.tenant_id = $2
            ORDER BY c.created_on DESC, c.id DESC
            "#,
        )
        .bind(idea_id)
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(CoreError::infrastructure)?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn create_idea(
        &self,
        tenant_id: i32,
        user_id: i32,
        title: &str,
        description: &str,
    ) -> Result<Idea, CoreError> {
        let mut tx = self.pool.begin().await.map_err(CoreError::infrastructure)?;

        match Self::insert_idea(&mut *tx, tenant_id, user_id, title, description).await {
            Ok(idea) => {
                tx.commit().await.map_err(CoreError::infrastructure)?;
                debug!(tenant_id, number = idea.number, "idea created");
                Ok(idea)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback after failed idea insert also failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn add_comment(&self, user_id: i32, idea_id: i32, content: &str) -> Result<i32, CoreError> {
        let mut tx = self.pool.begin().await.map_err(CoreError::infrastructure)?;

        let inserted = sqlx::query_scalar::<_, i32>(
            "INSERT INTO comments (idea_id, content, user_id, created_on) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(idea_id)
        .bind(content)
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(id) => {
                tx.commit().await.map_err(CoreError::infrastructure)?;
                Ok(id)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback after failed comment insert also failed: {}", rollback_err);
                }
                Err(missing_reference(e, format!("idea {idea_id} or user {user_id}")))
            }
        }
    }
}

/// Task model and database operations
///
/// Tasks are work items with an optional assignee. The assignee is a weak
/// reference to a user by ID; listings expand it to the assignee's current
/// name and email with a LEFT JOIN at read time, so the expansion always
/// reflects the referenced user's stored values.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     status VARCHAR(50) NOT NULL DEFAULT 'pending',
///     assignee_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task model representing a work item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Short description of the work
    pub title: String,

    /// Free-form status label (e.g. "pending", "in_progress", "done")
    pub status: String,

    /// User the task is assigned to, if any
    pub assignee_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Display fields of an assignee, expanded at read time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Task with its assignee reference expanded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskWithAssignee {
    pub id: Uuid,
    pub title: String,
    pub status: String,

    /// None when the task is unassigned or the assignee was deleted
    pub assignee: Option<Assignee>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub status: String,
    pub assignee_id: Option<Uuid>,
}

/// Flat row shape produced by the JOIN queries below
#[derive(Debug, sqlx::FromRow)]
struct TaskJoinRow {
    id: Uuid,
    title: String,
    status: String,
    assignee_id: Option<Uuid>,
    assignee_name: Option<String>,
    assignee_email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TaskJoinRow> for TaskWithAssignee {
    fn from(row: TaskJoinRow) -> Self {
        let assignee = match (row.assignee_id, row.assignee_name, row.assignee_email) {
            (Some(id), Some(name), Some(email)) => Some(Assignee { id, name, email }),
            _ => None,
        };

        Self {
            id: row.id,
            title: row.title,
            status: row.status,
            assignee,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Task {
    /// Creates a new task
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, status, assignee_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, status, assignee_id, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.status)
        .bind(data.assignee_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks with the assignee expanded to name and email
    pub async fn list_with_assignee(pool: &PgPool) -> Result<Vec<TaskWithAssignee>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TaskJoinRow>(
            r#"
            SELECT t.id, t.title, t.status, t.assignee_id,
                   u.name AS assignee_name, u.email AS assignee_email,
                   t.created_at, t.updated_at
            FROM tasks t
            LEFT JOIN users u ON u.id = t.assignee_id
            ORDER BY t.created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(TaskWithAssignee::from).collect())
    }

    /// Lists tasks assigned to a specific user, assignee expanded
    pub async fn list_for_assignee(
        pool: &PgPool,
        assignee_id: Uuid,
    ) -> Result<Vec<TaskWithAssignee>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TaskJoinRow>(
            r#"
            SELECT t.id, t.title, t.status, t.assignee_id,
                   u.name AS assignee_name, u.email AS assignee_email,
                   t.created_at, t.updated_at
            FROM tasks t
            LEFT JOIN users u ON u.id = t.assignee_id
            WHERE t.assignee_id = $1
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(assignee_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(TaskWithAssignee::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_row_expands_assignee() {
        let id = Uuid::new_v4();
        let row = TaskJoinRow {
            id: Uuid::new_v4(),
            title: "Wash and fold".to_string(),
            status: "pending".to_string(),
            assignee_id: Some(id),
            assignee_name: Some("Bob".to_string()),
            assignee_email: Some("bob@example.com".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let task: TaskWithAssignee = row.into();
        let assignee = task.assignee.expect("assignee should be expanded");
        assert_eq!(assignee.id, id);
        assert_eq!(assignee.name, "Bob");
        assert_eq!(assignee.email, "bob@example.com");
    }

    #[test]
    fn test_join_row_without_assignee() {
        let row = TaskJoinRow {
            id: Uuid::new_v4(),
            title: "Dry cleaning".to_string(),
            status: "pending".to_string(),
            assignee_id: None,
            assignee_name: None,
            assignee_email: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let task: TaskWithAssignee = row.into();
        assert!(task.assignee.is_none());
    }

    #[test]
    fn test_task_with_assignee_serialization() {
        let task = TaskWithAssignee {
            id: Uuid::new_v4(),
            title: "Ironing".to_string(),
            status: "done".to_string(),
            assignee: Some(Assignee {
                id: Uuid::new_v4(),
                name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
            }),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["assignee"]["name"], "Bob");
        assert_eq!(json["assignee"]["email"], "bob@example.com");
        // Assignee display fields only, nothing sensitive
        assert!(json["assignee"].get("password_hash").is_none());
        assert!(json["assignee"].get("role").is_none());
    }
}

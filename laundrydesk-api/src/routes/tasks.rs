/// Task endpoints
///
/// - `GET /v1/tasks` - All tasks with assignee expanded (admin only)
///
/// The assignee reference is expanded to `{id, name, email}` at read time,
/// so the listing always reflects the referenced user's current stored
/// values.

use crate::{app::AppState, error::ApiResult, response::Envelope};
use axum::{extract::State, Json};
use laundrydesk_shared::models::task::{Task, TaskWithAssignee};

/// Full task list with assignees (admin only)
pub async fn list_tasks(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<TaskWithAssignee>>>> {
    let tasks = Task::list_with_assignee(&state.db).await?;

    Ok(Json(Envelope::list(tasks)))
}

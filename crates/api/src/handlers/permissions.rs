//! Handler for `GET /admin/permissions`.

use axum::extract::State;
use axum::Json;
use gemeinde_core::permissions::names;
use gemeinde_db::models::permission::PermissionRow;
use gemeinde_db::repositories::PermissionRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// All permissions of one category.
#[derive(Debug, Serialize)]
pub struct PermissionGroup {
    pub category: String,
    pub permissions: Vec<PermissionRow>,
}

/// Group rows by category, keeping the first-seen category order.
fn group_by_category(rows: Vec<PermissionRow>) -> Vec<PermissionGroup> {
    let mut groups: Vec<PermissionGroup> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|g| g.category == row.category) {
            Some(group) => group.permissions.push(row),
            None => groups.push(PermissionGroup {
                category: row.category.clone(),
                permissions: vec![row],
            }),
        }
    }
    groups
}

/// GET /api/v1/admin/permissions
///
/// The permission catalogue, grouped for the role editor.
pub async fn list_permissions(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<PermissionGroup>>>> {
    user.require(names::ROLES_VIEW)?;
    let rows = PermissionRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: group_by_category(rows),
    }))
}

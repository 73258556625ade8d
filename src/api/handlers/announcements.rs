use axum::{
    extract::{Query, State},
    Extension, Form, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{AnnouncementSummary, User},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub category: Option<String>,
}

/// Accepted from the query string or a urlencoded body.
#[derive(Debug, Deserialize)]
pub struct MarkAsReadParams {
    pub id: Option<String>,
}

fn current_user(user: Option<Extension<CurrentUser>>) -> Option<User> {
    user.map(|Extension(current)| current.user)
}

pub async fn recent(
    State(state): State<AppState>,
    Query(params): Query<RecentQuery>,
    user: Option<Extension<CurrentUser>>,
) -> Result<Json<Vec<AnnouncementSummary>>> {
    let user = current_user(user);

    let recent = state.service_context.announcement_service
        .recent_for(user.as_ref(), None, params.category.as_deref())
        .await?;

    Ok(Json(recent.iter().map(AnnouncementSummary::from).collect()))
}

pub async fn current(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Result<Json<Option<AnnouncementSummary>>> {
    let user = current_user(user);

    let current = state.service_context.announcement_service
        .current(user.as_ref())
        .await?;

    Ok(Json(current.as_ref().map(AnnouncementSummary::from)))
}

pub async fn mark_as_read(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Query(query): Query<MarkAsReadParams>,
    form: Option<Form<MarkAsReadParams>>,
) -> Result<Json<&'static str>> {
    let user = current_user(user);

    let id = form
        .and_then(|Form(form)| form.id)
        .or(query.id);
    let id = id
        .as_deref()
        .and_then(|id| Uuid::parse_str(id.trim()).ok())
        .ok_or_else(|| AppError::InvalidArgument("A valid announcement id is required".to_string()))?;

    state.service_context.announcement_service
        .mark_as_read(user.as_ref(), id)
        .await?;

    Ok(Json("ok"))
}

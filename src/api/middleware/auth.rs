use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    api::state::AppState,
    auth::SESSION_COOKIE,
    domain::User,
};

#[derive(Clone)]
pub struct CurrentUser {
    pub user: User,
}

/// Attaches `CurrentUser` when the session cookie resolves to a user.
/// Handlers decide what to do when it's missing.
pub async fn optional_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(session_cookie) = jar.get(SESSION_COOKIE) {
        match state.service_context.identity.resolve(session_cookie.value()).await {
            Ok(Some(user)) => {
                request.extensions_mut().insert(CurrentUser { user });
            }
            Ok(None) => tracing::debug!("Session cookie did not resolve to a user"),
            Err(e) => tracing::warn!("Failed to resolve current user: {}", e),
        }
    }

    next.run(request).await
}

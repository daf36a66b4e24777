use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use crate::auth::expired_session_cookie;
use crate::auth::flash::take_flash;
use crate::auth::PageUser;
use crate::errors::AppError;
use crate::pages;
use crate::state::AppState;

// Page handlers only read cached data; model calls happen in the JSON
// endpoints the pages call after load.

/// GET /dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    PageUser(user): PageUser,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let Some(record) = state.store.get_user(&user.username).await? else {
        warn!("Session for unknown user {}", user.username);
        state.sessions.remove(&user.token).await;
        let jar = jar.remove(expired_session_cookie());
        return Ok((jar, Redirect::to("/login")).into_response());
    };
    let profile = state.store.current_profile(&user.username).await?;

    let (jar, flash) = take_flash(jar);
    let message = flash.map(|f| f.message(Some(&user.username)));
    let page = pages::dashboard_page(
        &user.username,
        &record,
        profile.as_ref(),
        message.as_ref(),
    );
    Ok((jar, page).into_response())
}

/// GET /roadmap
pub async fn roadmap(
    State(state): State<AppState>,
    PageUser(user): PageUser,
) -> Result<Response, AppError> {
    let profile = state.store.current_profile(&user.username).await?;
    Ok(pages::roadmap_page(&user.username, profile.as_ref()).into_response())
}

/// GET /recommendation
pub async fn recommendation(PageUser(user): PageUser) -> Html<String> {
    pages::recommendation_page(&user.username)
}

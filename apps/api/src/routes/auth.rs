use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::flash::{set_flash, take_flash, Flash, FlashMessage};
use crate::auth::{expired_session_cookie, session_cookie, PageUser, SESSION_COOKIE};
use crate::errors::AppError;
use crate::models::user::UserRecord;
use crate::pages;
use crate::state::AppState;

pub const INVALID_CREDENTIALS: &str = "Invalid username or password. Please try again.";

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Usernames become part of profile file names.
fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.starts_with('.') {
        return Err("Usernames cannot start with '.'.");
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err("Usernames may only contain letters, digits, '.', '_' and '-'.");
    }
    Ok(())
}

fn flash_page(jar: CookieJar, render: fn(Option<&FlashMessage>) -> Html<String>) -> Response {
    let (jar, flash) = take_flash(jar);
    let message = flash.map(|f| f.message(None));
    (jar, render(message.as_ref())).into_response()
}

/// GET /
pub async fn index() -> Redirect {
    Redirect::to("/login")
}

/// GET /login
pub async fn login_form(jar: CookieJar) -> Response {
    flash_page(jar, pages::login_page)
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(credentials): Form<Credentials>,
) -> Result<Response, AppError> {
    let username = credentials.username.trim();
    let user = state.store.get_user(username).await?;

    match user {
        Some(record) if record.verify_password(&credentials.password) => {
            if let Some(previous) = jar.get(SESSION_COOKIE) {
                state.sessions.remove(previous.value()).await;
            }
            let token = state.sessions.create(username).await;
            let jar = jar.add(session_cookie(token, state.config.secure_cookies));
            info!("User {username} logged in");
            Ok((set_flash(jar, Flash::LoggedIn), Redirect::to("/dashboard")).into_response())
        }
        _ => {
            warn!("Failed login attempt for {username}");
            Ok(pages::login_page(Some(&FlashMessage::danger(INVALID_CREDENTIALS))).into_response())
        }
    }
}

/// GET /register
pub async fn register_form(jar: CookieJar) -> Response {
    flash_page(jar, pages::register_page)
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(credentials): Form<Credentials>,
) -> Result<Response, AppError> {
    let username = credentials.username.trim();
    let rejection = if username.is_empty() || credentials.password.is_empty() {
        Some("Username and password are required.")
    } else {
        validate_username(username).err()
    };
    if let Some(message) = rejection {
        let page = pages::register_page(Some(&FlashMessage::danger(message)));
        return Ok((StatusCode::BAD_REQUEST, page).into_response());
    }

    if !state
        .store
        .create_user(username, UserRecord::new(credentials.password))
        .await?
    {
        return Ok((
            set_flash(jar, Flash::UsernameTaken),
            Redirect::to("/register"),
        )
            .into_response());
    }

    info!("Registered user {username}");
    Ok((set_flash(jar, Flash::Registered), Redirect::to("/login")).into_response())
}

/// GET /logout
pub async fn logout(
    State(state): State<AppState>,
    PageUser(user): PageUser,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    state.sessions.remove(&user.token).await;
    info!("User {} logged out", user.username);
    let jar = jar.remove(expired_session_cookie());
    (set_flash(jar, Flash::LoggedOut), Redirect::to("/login"))
}

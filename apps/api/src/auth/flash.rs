//! One-shot status messages carried across a redirect in a cookie.
//! The cookie holds a fixed code, never user-supplied text.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub const FLASH_COOKIE: &str = "ignite_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    LoggedIn,
    Registered,
    UsernameTaken,
    LoggedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Danger,
}

impl FlashKind {
    pub fn css_class(self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Danger => "danger",
        }
    }
}

/// A message ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub text: String,
}

impl FlashMessage {
    pub fn danger(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Danger,
            text: text.into(),
        }
    }
}

impl Flash {
    pub fn code(self) -> &'static str {
        match self {
            Flash::LoggedIn => "logged_in",
            Flash::Registered => "registered",
            Flash::UsernameTaken => "username_taken",
            Flash::LoggedOut => "logged_out",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "logged_in" => Some(Flash::LoggedIn),
            "registered" => Some(Flash::Registered),
            "username_taken" => Some(Flash::UsernameTaken),
            "logged_out" => Some(Flash::LoggedOut),
            _ => None,
        }
    }

    /// `username` personalises the login greeting when known.
    pub fn message(self, username: Option<&str>) -> FlashMessage {
        let (kind, text) = match self {
            Flash::LoggedIn => (
                FlashKind::Success,
                match username {
                    Some(name) => format!("Welcome, {name}! You have successfully logged in."),
                    None => "You have successfully logged in.".to_string(),
                },
            ),
            Flash::Registered => (
                FlashKind::Success,
                "Registration successful! Please log in.".to_string(),
            ),
            Flash::UsernameTaken => (
                FlashKind::Danger,
                "Username already exists. Please choose a different one.".to_string(),
            ),
            Flash::LoggedOut => (
                FlashKind::Success,
                "You have been successfully logged out.".to_string(),
            ),
        };
        FlashMessage { kind, text }
    }
}

/// Queues a flash for the next page render.
pub fn set_flash(jar: CookieJar, flash: Flash) -> CookieJar {
    jar.add(
        Cookie::build((FLASH_COOKIE, flash.code()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build(),
    )
}

/// Reads and clears the pending flash, if any.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };
    let flash = Flash::from_code(cookie.value());
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/").build());
    (jar, flash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for flash in [
            Flash::LoggedIn,
            Flash::Registered,
            Flash::UsernameTaken,
            Flash::LoggedOut,
        ] {
            assert_eq!(Flash::from_code(flash.code()), Some(flash));
        }
        assert_eq!(Flash::from_code("<script>"), None);
    }

    #[test]
    fn test_login_greeting_uses_username() {
        let message = Flash::LoggedIn.message(Some("ada"));
        assert_eq!(message.kind, FlashKind::Success);
        assert!(message.text.contains("Welcome, ada!"));
    }

    #[test]
    fn test_take_flash_consumes_cookie() {
        let jar = set_flash(CookieJar::new(), Flash::Registered);
        let (jar, flash) = take_flash(jar);
        assert_eq!(flash, Some(Flash::Registered));
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn test_take_flash_without_cookie() {
        let (_, flash) = take_flash(CookieJar::new());
        assert!(flash.is_none());
    }
}

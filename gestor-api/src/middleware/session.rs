/// Session gate middleware and cookie helpers
///
/// Protected routes run behind [`session_gate`], which resolves the session
/// token from the request cookie and injects the owner's identity as a
/// [`CurrentUser`] extension. Requests without a live session are rejected
/// with 403 before reaching any handler.
///
/// The cookie helpers are shared with the auth routes, which set and clear
/// the session cookie on login and logout.

use axum::{
    extract::{Request, State},
    http::header::COOKIE,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::error::ApiError;

/// Identity of the authenticated caller, injected by the session gate
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Email of the session owner
    pub email: String,
}

/// Rejects requests without a live session
///
/// Reads the session cookie, resolves it against the session store, and
/// attaches the owner's email to the request. A missing cookie, an unknown
/// token, and an expired session all produce the same 403 response.
pub async fn session_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let cookie_header = request
        .headers()
        .get(COOKIE)
        .and_then(|value| value.to_str().ok());

    let token = cookie_header
        .and_then(|header| get_cookie(header, &state.config.session.cookie_name))
        .ok_or_else(|| ApiError::Forbidden("Não autenticado".to_string()))?;

    let email = state
        .sessions
        .resolve(&token)
        .await
        .ok_or_else(|| ApiError::Forbidden("Não autenticado".to_string()))?;

    request.extensions_mut().insert(CurrentUser { email });

    Ok(next.run(request).await)
}

/// Extracts a named cookie's value from a `Cookie` request header
pub fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key == name {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Builds the `Set-Cookie` value carrying a session token
///
/// The cookie is HttpOnly and scoped to the whole site. In secure mode it is
/// marked `Secure; SameSite=None` so cross-site frontends can send it;
/// otherwise `SameSite=Lax` keeps plain-HTTP development working.
pub fn build_session_cookie(name: &str, token: &str, max_age_seconds: u64, secure: bool) -> String {
    if secure {
        format!(
            "{}={}; HttpOnly; Secure; Path=/; Max-Age={}; SameSite=None",
            name, token, max_age_seconds
        )
    } else {
        format!(
            "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
            name, token, max_age_seconds
        )
    }
}

/// Builds the `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie(name: &str, secure: bool) -> String {
    if secure {
        format!(
            "{}=; HttpOnly; Secure; Path=/; Max-Age=0; SameSite=None",
            name
        )
    } else {
        format!("{}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cookie_finds_named_value() {
        let header = "tema=escuro; sessao=abc123; outro=x";
        assert_eq!(get_cookie(header, "sessao"), Some("abc123".to_string()));
    }

    #[test]
    fn test_get_cookie_missing_name() {
        let header = "tema=escuro; outro=x";
        assert_eq!(get_cookie(header, "sessao"), None);
    }

    #[test]
    fn test_get_cookie_ignores_prefix_matches() {
        let header = "sessao_antiga=velha; sessao=nova";
        assert_eq!(get_cookie(header, "sessao"), Some("nova".to_string()));
    }

    #[test]
    fn test_build_session_cookie_insecure() {
        let cookie = build_session_cookie("sessao", "tok", 3600, false);
        assert_eq!(
            cookie,
            "sessao=tok; HttpOnly; Path=/; Max-Age=3600; SameSite=Lax"
        );
    }

    #[test]
    fn test_build_session_cookie_secure_is_cross_site() {
        let cookie = build_session_cookie("sessao", "tok", 3600, true);
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=None"));
    }

    #[test]
    fn test_clear_session_cookie_expires_immediately() {
        let cookie = clear_session_cookie("sessao", false);
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.starts_with("sessao=;"));
    }
}

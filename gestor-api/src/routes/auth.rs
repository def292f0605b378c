/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login (issues a session cookie)
/// - Logout (destroys the session)
///
/// # Endpoints
///
/// - `POST /api/auth/registar` - Register new user
/// - `POST /api/auth/login` - Login and receive the session cookie
/// - `POST /api/auth/logout` - Logout and clear the session cookie

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::session::{build_session_cookie, clear_session_cookie, get_cookie},
};
use axum::{
    extract::State,
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, StatusCode,
    },
    response::{AppendHeaders, IntoResponse},
    Json,
};
use gestor_shared::{
    auth::password,
    models::user::{CreateUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Email inválido."))]
    pub email: String,

    /// Password (any non-empty value is accepted)
    #[validate(length(min = 1, message = "A palavra-passe é obrigatória."))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Email inválido."))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Message-only response body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable outcome message
    pub message: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Human-readable outcome message
    pub message: String,

    /// Email of the logged-in user
    pub email: String,
}

/// Register a new user
///
/// Creates a new user account keyed by email. The password is stored as an
/// Argon2id hash, never in clear.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/registar
/// Content-Type: application/json
///
/// {
///   "email": "ana@example.com",
///   "password": "segredo"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or email already registered
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    // Duplicate check before insert gives the canonical message; the unique
    // constraint still backstops concurrent registrations.
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Utilizador já existe.".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Utilizador registado com sucesso.".to_string(),
        }),
    ))
}

/// Login endpoint
///
/// Verifies credentials and issues a session cookie. A missing user and a
/// wrong password produce the same response, so login failures do not leak
/// which emails are registered.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "ana@example.com",
///   "password": "segredo"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Invalid credentials
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Credenciais inválidas.".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Credenciais inválidas.".to_string()));
    }

    // The token is persisted in the session store before the response leaves,
    // so a request arriving right after login always resolves.
    let token = state.sessions.create(&user.email).await;

    let cookie = build_session_cookie(
        &state.config.session.cookie_name,
        &token,
        state.config.session.ttl_seconds,
        state.config.session.cookie_secure,
    );

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LoginResponse {
            message: "Login com sucesso.".to_string(),
            email: user.email,
        }),
    ))
}

/// Logout endpoint
///
/// Destroys the session named by the request cookie, if any, and clears the
/// cookie. Always succeeds: logging out without a session is a no-op.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/logout
/// ```
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let token = headers
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| get_cookie(header, &state.config.session.cookie_name));

    if let Some(token) = token {
        state.sessions.destroy(&token).await;
    }

    let cookie = clear_session_cookie(
        &state.config.session.cookie_name,
        state.config.session.cookie_secure,
    );

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(MessageResponse {
            message: "Logout efetuado com sucesso.".to_string(),
        }),
    ))
}

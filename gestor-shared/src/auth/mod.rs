/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`session`]: Server-held session store keyed by opaque cookie tokens
///
/// Passwords are hashed with Argon2id and stored in PHC string format;
/// verification is constant-time. Sessions bind a random token to the
/// authenticated email for a fixed TTL and are resolved on every request to
/// a protected route.

pub mod password;
pub mod session;

/// Middleware modules for the API server
///
/// - `session`: the session gate protecting task and upload routes, plus
///   cookie helpers shared with the auth routes

pub mod session;

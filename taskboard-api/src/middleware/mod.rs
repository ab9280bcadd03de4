/// Middleware modules for the API server
///
/// - `security`: Security response headers
///
/// Authentication is applied in `app::build_router` as a route layer so
/// that `/api/login` and `/health` stay public.

pub mod security;

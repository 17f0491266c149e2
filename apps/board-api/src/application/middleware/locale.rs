use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::AppState;

/// Locale negotiated for the current request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestLocale(pub &'static str);

pub async fn resolve_locale(State(app_state): State<AppState>, mut req: Request, next: Next) -> Response {
    let locale = req
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(|accept| app_state.locales.negotiate(accept))
        .unwrap_or_else(|| app_state.locales.default_locale());
    req.extensions_mut().insert(RequestLocale(locale));
    next.run(req).await
}

//! Cookie-presence session gate for the profile edit routes.
//!
//! Mirrors the edge middleware in front of the site: any non-empty value of
//! the session cookie lets the request through, otherwise the client is
//! redirected to the login page. This is NOT authentication - the cookie is
//! never validated here. Handlers behind the gate still require a verified
//! bearer token via `RequireAuth`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::app::AppState;

/// True when the named cookie exists with a non-empty value.
pub fn session_present(jar: &CookieJar, cookie_name: &str) -> bool {
    jar.get(cookie_name)
        .map(|c| !c.value().is_empty())
        .unwrap_or(false)
}

pub async fn session_gate(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    if session_present(&jar, &state.settings.session_cookie_name) {
        return next.run(request).await;
    }

    tracing::debug!(
        path = %request.uri().path(),
        "No session cookie, redirecting to login"
    );
    Redirect::temporary(&state.settings.login_redirect_path).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderMap, HeaderValue};

    fn jar_with(cookie_header: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie_header).unwrap());
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn any_non_empty_value_passes() {
        let jar = jar_with("sb-access-token=not-even-a-jwt");
        assert!(session_present(&jar, "sb-access-token"));
    }

    #[test]
    fn missing_cookie_fails() {
        let jar = jar_with("other=1");
        assert!(!session_present(&jar, "sb-access-token"));
    }

    #[test]
    fn empty_value_fails() {
        let jar = jar_with("sb-access-token=");
        assert!(!session_present(&jar, "sb-access-token"));
    }
}

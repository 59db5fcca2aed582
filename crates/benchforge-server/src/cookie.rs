//! Hand-rolled `Cookie`/`Set-Cookie` handling. No cookie crate is used
//! anywhere in the corpus; this mirrors the teacher's own manual header
//! parsing for bearer tokens (`auth::auth_middleware`'s
//! `headers().get(header::AUTHORIZATION)` → `strip_prefix("Bearer ")`),
//! generalized to scanning `key=value; ...` pairs out of the `Cookie`
//! header.

use axum::http::{header, HeaderMap, HeaderValue};

pub const USER_ID_COOKIE: &str = "userId";

/// Read `userId` out of the `Cookie` request header, if present.
pub fn read_user_id(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let pair = pair.trim();
        let (key, value) = pair.split_once('=')?;
        (key == USER_ID_COOKIE).then(|| value.to_string())
    })
}

/// Build a `Set-Cookie` header value issuing a fresh `userId` token.
pub fn set_user_id_header(user_id: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("{USER_ID_COOKIE}={user_id}; Path=/; HttpOnly"))
        .expect("cookie value is hex, always a valid header value")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_cookie_among_several() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("foo=bar; userId=deadbeef; baz=qux"));
        assert_eq!(read_user_id(&headers), Some("deadbeef".to_string()));
    }

    #[test]
    fn missing_cookie_header_is_none() {
        let headers = HeaderMap::new();
        assert_eq!(read_user_id(&headers), None);
    }

    #[test]
    fn missing_user_id_key_is_none() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("foo=bar"));
        assert_eq!(read_user_id(&headers), None);
    }
}

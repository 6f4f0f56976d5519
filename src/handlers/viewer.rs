//! Requesting identity
//!
//! Sessions are handled upstream; the session layer forwards the signed-in
//! user as `x-user-id`. Anything missing or unparseable is anonymous.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewer(pub Option<i64>);

impl Viewer {
    pub fn user_id(&self) -> Option<i64> {
        self.0
    }
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok());

        Ok(Viewer(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn viewer_for(header: Option<&str>) -> Viewer {
        let mut builder = Request::builder().uri("/api/gpus");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Viewer::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_viewer_from_header() {
        assert_eq!(viewer_for(Some("42")).await, Viewer(Some(42)));
        assert_eq!(viewer_for(Some("guest")).await, Viewer(None));
        assert_eq!(viewer_for(None).await, Viewer(None));
    }
}

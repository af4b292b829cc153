//! Attaches the access credential to outgoing requests.

use crate::api::request::ApiRequest;

pub const AUTHORIZATION: &str = "Authorization";

/// Format a bearer authorization header value.
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Return `request` with `Authorization: Bearer <access>` set, replacing any
/// existing authorization header. With no access credential the request is
/// returned unchanged.
pub fn authenticate(mut request: ApiRequest, access: Option<&str>) -> ApiRequest {
    let Some(access) = access else {
        return request;
    };
    request
        .headers
        .retain(|name, _| !name.eq_ignore_ascii_case(AUTHORIZATION));
    request
        .headers
        .insert(AUTHORIZATION.to_string(), bearer(access));
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Method;

    #[test]
    fn test_attaches_bearer() {
        let request = authenticate(ApiRequest::get("/feed"), Some("tok1"));
        assert_eq!(request.header(AUTHORIZATION), Some("Bearer tok1"));
    }

    #[test]
    fn test_without_credential_is_unchanged() {
        let original = ApiRequest::new(Method::Post, "/post")
            .with_header("X-Custom", "1")
            .with_body(serde_json::json!({"heading": "hi"}));
        let request = authenticate(original.clone(), None);
        assert_eq!(request, original);
    }

    #[test]
    fn test_replaces_existing_header_any_case() {
        let request = ApiRequest::get("/feed").with_header("authorization", "Bearer stale");
        let request = authenticate(request, Some("fresh"));

        let auth_headers: Vec<_> = request
            .headers
            .keys()
            .filter(|k| k.eq_ignore_ascii_case(AUTHORIZATION))
            .collect();
        assert_eq!(auth_headers.len(), 1);
        assert_eq!(request.header(AUTHORIZATION), Some("Bearer fresh"));
    }

    #[test]
    fn test_preserves_retry_flag_and_body() {
        let mut request = ApiRequest::new(Method::Patch, "/notifications/read")
            .with_body(serde_json::json!({"ids": ["n1"]}));
        request.mark_retried();

        let request = authenticate(request, Some("tok"));
        assert!(request.retried);
        assert_eq!(request.body, Some(serde_json::json!({"ids": ["n1"]})));
    }
}

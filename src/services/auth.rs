//! Sign-up, sign-in and sign-out.

use std::sync::Arc;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiRequest};
use crate::error::{ApiError, ApiResult};
use crate::models::{AuthResponse, LoginRequest, SignupRequest};

#[derive(Debug, Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Create an account and store the issued credentials.
    pub async fn signup(&self, request: &SignupRequest) -> ApiResult<AuthResponse> {
        let request = ApiRequest::post("/auth/signup")
            .with_json(request)?
            .without_refresh();
        self.authenticate(request).await
    }

    /// Sign in with an email or username and store the issued credentials.
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        let request = ApiRequest::post("/auth/login")
            .with_json(request)?
            .without_refresh();
        self.authenticate(request).await
    }

    /// Tell the server to end the session, then clear local credentials.
    /// Local credentials are cleared even if the server call fails.
    pub async fn logout(&self) {
        if let Err(err) = self
            .client
            .execute_unit(ApiRequest::post("/auth/logout").without_refresh())
            .await
        {
            warn!("Logout request failed, clearing local credentials anyway: {}", err);
        }
        self.client.sign_out().await;
    }

    async fn authenticate(&self, request: ApiRequest) -> ApiResult<AuthResponse> {
        let response: AuthResponse = self.client.execute_json(request).await?;
        let pair = response.to_pair().ok_or_else(|| {
            ApiError::Decode("response is missing access_token or refresh_token".to_string())
        })?;
        self.client.sign_in(&pair).await?;
        info!("Credentials issued and stored");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryCredentials, MockHttpClient, MockResponse};
    use crate::auth::{CredentialPair, SessionEvent};
    use crate::config::ClientConfig;
    use crate::traits::HttpError;
    use serde_json::json;

    fn service(
        pair: Option<CredentialPair>,
    ) -> (AuthService, Arc<ApiClient>, MockHttpClient, InMemoryCredentials) {
        let http = MockHttpClient::new();
        let store = InMemoryCredentials::new();
        store.set_pair(pair);
        let config = ClientConfig::new().with_base_url("http://api.test");
        let client = Arc::new(ApiClient::new(
            &config,
            Arc::new(http.clone()),
            Arc::new(store.clone()),
        ));
        (AuthService::new(Arc::clone(&client)), client, http, store)
    }

    #[tokio::test]
    async fn test_login_stores_pair() {
        let (auth, client, http, store) = service(None);
        http.set_response(
            "http://api.test/auth/login",
            MockResponse::json(201, json!({"access_token": "tok1", "refresh_token": "ref1"})),
        );
        let mut events = client.subscribe();

        auth.login(&LoginRequest::new("ana", "hunter22")).await.unwrap();

        assert_eq!(store.pair(), Some(CredentialPair::new("tok1", "ref1")));
        assert_eq!(events.try_recv().unwrap(), SessionEvent::SignedIn);
        let sent = &http.get_requests()[0];
        assert_eq!(
            sent.body.as_deref().map(|b| serde_json::from_str::<serde_json::Value>(b).unwrap()),
            Some(json!({"identifier": "ana", "password": "hunter22"}))
        );
    }

    #[tokio::test]
    async fn test_bad_password_does_not_refresh() {
        let (auth, _, http, store) = service(None);
        http.set_response(
            "http://api.test/auth/login",
            MockResponse::json(401, json!({"message": "Invalid credentials"})),
        );

        let err = auth
            .login(&LoginRequest::new("ana", "wrong"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 401, ref message } if message == "Invalid credentials"));
        assert!(http.requests_to("http://api.test/auth/refresh").is_empty());
        assert_eq!(store.clear_count(), 0);
    }

    #[tokio::test]
    async fn test_signup_sends_display_name() {
        let (auth, _, http, store) = service(None);
        http.set_response(
            "http://api.test/auth/signup",
            MockResponse::json(201, json!({"access_token": "tok1", "refresh_token": "ref1"})),
        );

        auth.signup(
            &SignupRequest::new("ana@example.com")
                .with_password("hunter22")
                .with_username("ana")
                .with_display_name("Ana"),
        )
        .await
        .unwrap();

        let body: serde_json::Value =
            serde_json::from_str(http.get_requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["display_name"], "Ana");
        assert!(store.pair().is_some());
    }

    #[tokio::test]
    async fn test_incomplete_tokens_are_not_stored() {
        let (auth, _, http, store) = service(None);
        http.set_response(
            "http://api.test/auth/login",
            MockResponse::json(200, json!({"access_token": "tok1", "refresh_token": ""})),
        );

        let err = auth.login(&LoginRequest::new("ana", "pw")).await.unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_server_fails() {
        let (auth, client, http, store) = service(Some(CredentialPair::new("tok1", "ref1")));
        http.set_response(
            "http://api.test/auth/logout",
            MockResponse::Error(HttpError::ConnectionFailed("offline".into())),
        );
        let mut events = client.subscribe();

        auth.logout().await;

        assert!(store.pair().is_none());
        assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedOut);
        assert_eq!(
            http.get_requests()[0].authorization(),
            Some("Bearer tok1")
        );
    }
}

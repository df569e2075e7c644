use core_lib::{token::TokenSet, AuthError, OAuthConfig, OAuthProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::form_urlencoded;

use crate::environment::Environment;

#[derive(Deserialize, Serialize, Debug)]
struct ConnectTokenResponse {
    access_token: String,
    token_type: Option<String>,
    scope: Option<String>,
    organisation_id: Option<String>,
    email: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ConnectErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// GoCardless Connect, the OAuth server partners use to act for merchants.
pub struct GoCardlessConnect {
    config: OAuthConfig,
    authorize_url: String,
    token_url: String,
    http_client: Client,
}

impl GoCardlessConnect {
    pub fn new(config: OAuthConfig, environment: Environment) -> Self {
        GoCardlessConnect {
            config,
            authorize_url: environment.authorize_url(),
            token_url: environment.token_url(),
            http_client: Client::new(),
        }
    }

    pub fn with_test_urls(mut self, authorize_url: String, token_url: String) -> Self {
        self.authorize_url = authorize_url;
        self.token_url = token_url;
        self
    }
}

#[async_trait::async_trait]
impl OAuthProvider for GoCardlessConnect {
    fn auth_url(&self, state: &str, scopes: &[String]) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", &scopes.join(" "))
            .append_pair("state", state)
            .finish();

        format!("{}?{}", self.authorize_url, query)
    }

    fn default_scopes(&self) -> Vec<String> {
        self.config.scopes.clone()
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenSet, AuthError> {
        debug!(token_url = %self.token_url, "exchanging authorization code");

        let res = self
            .http_client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| {
                error!("Token request failed: {:?}", err);
                AuthError::TokenExchangeFailed(err.to_string())
            })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let reason = match serde_json::from_str::<ConnectErrorResponse>(&body) {
                Ok(ConnectErrorResponse {
                    error,
                    error_description: Some(description),
                }) => format!("{error}: {description}"),
                Ok(ConnectErrorResponse { error, .. }) => error,
                Err(_) => format!("token endpoint returned {status}"),
            };
            error!(%status, "Token exchange rejected: {}", reason);
            return Err(AuthError::TokenExchangeFailed(reason));
        }

        let token_response: ConnectTokenResponse = res.json().await.map_err(|err| {
            error!("Error parsing token response {:?}", err);
            AuthError::ProviderError(format!("Failed to parse token response: {err}"))
        })?;

        Ok(TokenSet {
            access_token: token_response.access_token,
            organisation_id: token_response.organisation_id,
            scope: token_response.scope,
            token_type: token_response.token_type,
            email: token_response.email,
        })
    }
}

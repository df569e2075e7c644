use thiserror::Error;
use token::TokenSet;

pub mod config;
pub mod partner;
pub mod session;
pub mod token;

pub use config::{OAuthConfig, PartnerCredentials, DEFAULT_REDIRECT_URI, DEFAULT_SCOPE};
pub use partner::Partner;
pub use session::{AuthSession, PendingAuthorization};

/// Represents an error that can occur during OAuth operations.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The redirected URL could not be parsed.
    #[error("Invalid authorization response: {0}")]
    InvalidRedirect(String),

    /// The authorization server redirected back with an `error` parameter.
    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("State returned by the authorization server does not match the one issued")]
    StateMismatch,

    #[error("Authorization response does not contain a code")]
    MissingCode,

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    /// Reading the redirected URL from the user failed.
    #[error("Failed to read authorization response: {0}")]
    Input(#[from] std::io::Error),
}

/// Defines the behavior that any OAuth provider must implement.
#[async_trait::async_trait]
pub trait OAuthProvider {
    /// Returns the URL to initiate the OAuth authorization flow.
    fn auth_url(&self, state: &str, scopes: &[String]) -> String;

    /// Scopes requested when the caller does not ask for specific ones.
    fn default_scopes(&self) -> Vec<String> {
        vec![DEFAULT_SCOPE.to_string()]
    }

    /// Exchanges an authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> Result<TokenSet, AuthError>;
}

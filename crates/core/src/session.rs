use rand::{distr::Alphanumeric, Rng};
use tracing::{debug, info};
use url::Url;

use crate::{token::TokenSet, AuthError, OAuthProvider};

const STATE_LEN: usize = 30;

/// An authorization-code flow that has been started but not completed yet.
#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    pub scopes: Vec<String>,
    /// Set once an authorization URL has been handed out.
    pub state: Option<String>,
}

impl PendingAuthorization {
    fn new(scopes: Vec<String>) -> Self {
        Self {
            scopes,
            state: None,
        }
    }
}

/// Holds the token for one merchant organisation and drives the
/// authorization-code flow that obtains it.
///
/// The flow is two-phase: [`AuthSession::authorization_url`] hands out the URL
/// the merchant must visit, and [`AuthSession::complete_oauth_flow`] takes the
/// URL they were redirected to. The caller decides how to wait in between.
pub struct AuthSession<P> {
    provider: P,
    pending: Option<PendingAuthorization>,
    token: Option<TokenSet>,
}

impl<P: OAuthProvider> AuthSession<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            pending: None,
            token: None,
        }
    }

    pub fn with_token(mut self, token: TokenSet) -> Self {
        self.token = Some(token);
        self
    }

    /// Starts a fresh authorization, discarding any previous one. Without
    /// explicit scopes the provider's defaults are requested.
    pub fn initialize_oauth_session(&mut self, scopes: Option<Vec<String>>) -> &PendingAuthorization {
        let scopes = scopes.unwrap_or_else(|| self.provider.default_scopes());
        let pending = PendingAuthorization::new(scopes);
        debug!(scopes = ?pending.scopes, "initializing oauth session");
        self.pending.insert(pending)
    }

    pub fn pending(&self) -> Option<&PendingAuthorization> {
        self.pending.as_ref()
    }

    /// Returns the URL the merchant must visit. Every call issues a new state.
    pub fn authorization_url(&mut self) -> String {
        let pending = self
            .pending
            .get_or_insert_with(|| PendingAuthorization::new(self.provider.default_scopes()));
        let state = generate_state();
        let url = self.provider.auth_url(&state, &pending.scopes);
        pending.state = Some(state);
        url
    }

    /// Exchanges the code carried by the redirected URL for a token.
    pub async fn complete_oauth_flow(
        &mut self,
        authorization_response: &str,
    ) -> Result<&TokenSet, AuthError> {
        let expected_state = self
            .pending
            .get_or_insert_with(|| PendingAuthorization::new(self.provider.default_scopes()))
            .state
            .clone();

        let code = parse_authorization_response(authorization_response, expected_state.as_deref())?;
        let token = self.provider.exchange_code(&code).await?;

        info!(
            organisation_id = token.organisation_id.as_deref().unwrap_or_default(),
            "oauth flow completed"
        );
        self.pending = None;
        Ok(&*self.token.insert(token))
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_ref().is_some_and(TokenSet::is_complete)
    }

    pub fn token(&self) -> Option<&TokenSet> {
        self.token.as_ref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.access_token.as_str())
    }

    pub fn organisation_id(&self) -> Option<&str> {
        self.token.as_ref().and_then(|t| t.organisation_id.as_deref())
    }
}

fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LEN)
        .map(char::from)
        .collect()
}

/// Pulls the authorization code out of a redirected URL.
pub(crate) fn parse_authorization_response(
    authorization_response: &str,
    expected_state: Option<&str>,
) -> Result<String, AuthError> {
    let url = Url::parse(authorization_response.trim())
        .map_err(|e| AuthError::InvalidRedirect(e.to_string()))?;

    let mut code = None;
    let mut state = None;
    let mut error = None;
    let mut error_description = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            "error_description" => error_description = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(AuthError::AuthorizationDenied(match error_description {
            Some(description) => format!("{error}: {description}"),
            None => error,
        }));
    }

    if let Some(expected) = expected_state {
        if state.as_deref() != Some(expected) {
            return Err(AuthError::StateMismatch);
        }
    }

    code.filter(|c| !c.is_empty()).ok_or(AuthError::MissingCode)
}

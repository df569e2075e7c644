use crate::token::TokenSet;

pub const DEFAULT_REDIRECT_URI: &str = "https://test.gocardless.com/redirect";
pub const DEFAULT_SCOPE: &str = "read_write";

/// OAuth application credentials registered with the authorization server.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scopes: vec![DEFAULT_SCOPE.to_string()],
        }
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }
}

/// A pre-obtained partner token together with the organisation it acts for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerCredentials {
    pub access_token: String,
    pub organisation_id: String,
}

impl PartnerCredentials {
    /// Returns credentials only when both halves are present and non-empty.
    pub fn from_parts(access_token: Option<String>, organisation_id: Option<String>) -> Option<Self> {
        match (access_token, organisation_id) {
            (Some(access_token), Some(organisation_id))
                if !access_token.is_empty() && !organisation_id.is_empty() =>
            {
                Some(Self {
                    access_token,
                    organisation_id,
                })
            }
            _ => None,
        }
    }
}

impl From<PartnerCredentials> for TokenSet {
    fn from(credentials: PartnerCredentials) -> Self {
        TokenSet::new(credentials.access_token, credentials.organisation_id)
    }
}

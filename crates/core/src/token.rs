use serde::{Deserialize, Serialize};

/// Holds the access token issued on behalf of a merchant organisation.
///
/// GoCardless Connect tokens do not expire and come without a refresh token,
/// so the organisation id is the only piece of state that travels with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default)]
    pub organisation_id: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl TokenSet {
    pub fn new(access_token: impl Into<String>, organisation_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            organisation_id: Some(organisation_id.into()),
            scope: None,
            token_type: None,
            email: None,
        }
    }

    /// A token is only usable once both the bearer token and the organisation
    /// it acts for are known.
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty()
            && self
                .organisation_id
                .as_deref()
                .is_some_and(|org| !org.is_empty())
    }
}

use tracing::info;

use crate::{config::PartnerCredentials, session::AuthSession, AuthError, OAuthProvider};

/// A partner app acting on behalf of a merchant.
///
/// Wraps an [`AuthSession`] and short-circuits the OAuth flow when a
/// pre-obtained partner token is available.
pub struct Partner<P> {
    session: AuthSession<P>,
}

impl<P: OAuthProvider> Partner<P> {
    pub fn new(session: AuthSession<P>, credentials: Option<PartnerCredentials>) -> Self {
        let session = match credentials {
            Some(credentials) => {
                info!(
                    organisation_id = %credentials.organisation_id,
                    "Using existing partner token and organisation ID"
                );
                session.with_token(credentials.into())
            }
            None => session,
        };
        Self { session }
    }

    /// Runs the interactive authorization unless already authenticated.
    ///
    /// `read_redirect` receives the authorization URL and must return the full
    /// URL the merchant was redirected to.
    pub async fn authenticate<F>(&mut self, read_redirect: F) -> Result<(), AuthError>
    where
        F: FnOnce(&str) -> std::io::Result<String>,
    {
        if self.session.is_authenticated() {
            info!("Already authenticated with partner token");
            return Ok(());
        }

        let auth_url = self.session.authorization_url();
        let authorization_response = read_redirect(&auth_url)?;
        self.session
            .complete_oauth_flow(&authorization_response)
            .await?;
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn session(&self) -> &AuthSession<P> {
        &self.session
    }
}

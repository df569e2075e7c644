use anyhow::{bail, Context, Result};
use core_lib::{OAuthConfig, PartnerCredentials};
use gocardless::Environment;

pub const CLIENT_ID_VAR: &str = "GOCARD_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "GOCARD_SECRET";
pub const REDIRECT_URI_VAR: &str = "GOCARD_REDIRECT_URI";
pub const ENVIRONMENT_VAR: &str = "GOCARD_ENVIRONMENT";
pub const PARTNER_TOKEN_VAR: &str = "PARTNER_TOKEN";
pub const PARTNER_ORG_ID_VAR: &str = "PARTNER_ORG_ID";

/// Everything the demo reads from its environment, gathered once at startup.
#[derive(Debug)]
pub struct Settings {
    pub oauth: OAuthConfig,
    pub environment: Environment,
    pub partner: Option<PartnerCredentials>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let partner = PartnerCredentials::from_parts(var(PARTNER_TOKEN_VAR), var(PARTNER_ORG_ID_VAR));

        let environment = match var(ENVIRONMENT_VAR) {
            Some(value) => value
                .parse::<Environment>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("{ENVIRONMENT_VAR} is invalid"))?,
            None => Environment::default(),
        };

        let client_id = var(CLIENT_ID_VAR);
        let client_secret = var(CLIENT_SECRET_VAR);
        if partner.is_none() && (client_id.is_none() || client_secret.is_none()) {
            bail!(
                "{CLIENT_ID_VAR} and {CLIENT_SECRET_VAR} must be set unless \
                 {PARTNER_TOKEN_VAR} and {PARTNER_ORG_ID_VAR} are provided"
            );
        }

        let mut oauth = OAuthConfig::new(client_id.unwrap_or_default(), client_secret.unwrap_or_default());
        if let Some(redirect_uri) = var(REDIRECT_URI_VAR) {
            oauth = oauth.with_redirect_uri(redirect_uri);
        }

        Ok(Settings {
            oauth,
            environment,
            partner,
        })
    }
}

use std::{fmt, str::FromStr};

/// Which GoCardless deployment to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Sandbox,
    Live,
}

impl Environment {
    pub fn api_base_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => "https://api-sandbox.gocardless.com",
            Environment::Live => "https://api.gocardless.com",
        }
    }

    pub fn connect_base_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => "https://connect-sandbox.gocardless.com",
            Environment::Live => "https://connect.gocardless.com",
        }
    }

    pub fn authorize_url(&self) -> String {
        format!("{}/oauth/authorize", self.connect_base_url())
    }

    pub fn token_url(&self) -> String {
        format!("{}/oauth/access_token", self.connect_base_url())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Sandbox => write!(f, "sandbox"),
            Environment::Live => write!(f, "live"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sandbox" => Ok(Environment::Sandbox),
            "live" => Ok(Environment::Live),
            other => Err(format!("Unknown GoCardless environment: {other}")),
        }
    }
}

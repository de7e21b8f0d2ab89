use crate::errors::ReddExtractError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use std::collections::HashMap;

static TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Credentials holder for the application-only OAuth flow. The raw secrets
/// live here and nowhere else past startup.
pub struct Client {
    client_id: String,
    client_secret: String,
    user_agent: String,
}

/// A granted access token.
#[derive(Deserialize, Debug)]
pub struct Auth {
    pub access_token: String,
    pub expires_in: i64,
    pub scope: String,
}

impl Client {
    pub fn new(client_id: &str, client_secret: &str, user_agent: &str) -> Self {
        Client {
            client_id: client_id.to_owned(),
            client_secret: client_secret.to_owned(),
            user_agent: user_agent.to_owned(),
        }
    }

    /// Exchange the client credentials for a bearer token. Read-only access
    /// is all this program needs, so the userless grant is enough.
    pub async fn login(&self) -> Result<Auth, ReddExtractError> {
        let mut body = HashMap::new();
        body.insert("grant_type", "client_credentials");

        let auth = reqwest::Client::new()
            .post(TOKEN_URL)
            .header(USER_AGENT, &self.user_agent)
            .header(AUTHORIZATION, format!("Basic {}", self.basic_credentials()))
            .form(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<Auth>()
            .await?;

        Ok(auth)
    }

    fn basic_credentials(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_credentials_encode_id_and_secret() {
        let client = Client::new("my-id", "my-secret", "test-agent");
        // base64("my-id:my-secret")
        assert_eq!(client.basic_credentials(), "bXktaWQ6bXktc2VjcmV0");
    }
}

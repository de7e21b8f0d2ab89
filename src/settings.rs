use crate::errors::ReddExtractError;
use dotenv::dotenv;
use std::env;
use std::fmt;

static DEFAULT_POST_URL: &str =
    "https://www.reddit.com/r/AskReddit/comments/1kplv0m/whats_the_worst_city_youve_ever_visited/";

/// Holder for a sensitive string. Debug output is masked; the raw value is
/// only reachable through [`Secret::expose`].
pub struct Secret(String);

impl Secret {
    pub fn new(value: String) -> Self {
        Secret(value)
    }

    /// Hand out the raw value. Call this at the point of use only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", mask_sensitive(&self.0))
    }
}

/// Process-wide settings, loaded once at startup and passed down by reference.
#[derive(Debug)]
pub struct Settings {
    pub reddit_client_id: Secret,
    pub reddit_client_secret: Secret,
    pub reddit_user_agent: String,
    pub post_url: String,
}

impl Settings {
    /// Load settings from the environment, with a local `.env` file as
    /// fallback. Variables already present in the environment win over the
    /// file. Fails when a required variable is absent.
    pub fn from_env() -> Result<Self, ReddExtractError> {
        dotenv().ok();
        Self::from_source(|key| env::var(key).ok())
    }

    fn from_source<F>(get: F) -> Result<Self, ReddExtractError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            get(key).ok_or(ReddExtractError::MissingSetting(key))
        };

        Ok(Settings {
            reddit_client_id: Secret::new(required("REDDIT_CLIENT_ID")?),
            reddit_client_secret: Secret::new(required("REDDIT_CLIENT_SECRET")?),
            reddit_user_agent: required("REDDIT_USER_AGENT")?,
            post_url: get("POST_URL").unwrap_or_else(|| String::from(DEFAULT_POST_URL)),
        })
    }
}

/// Mask sensitive data such as client secrets before display
fn mask_sensitive(word: &str) -> String {
    let word_length = word.len();
    if word.is_empty() {
        // return with indication if string is empty
        String::from("<EMPTY>")
    } else if word_length <= 3 {
        // if string length is between 1-3, mask all characters
        "*".repeat(word_length)
    } else {
        // mask all characters except the first two and the last
        word.chars()
            .enumerate()
            .map(|(i, c)| {
                if i == 0 || i == 1 || i == word_length - 1 {
                    c
                } else {
                    '*'
                }
            })
            .collect()
    }
}

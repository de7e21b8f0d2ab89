mod auth;
mod errors;
mod extractor;
mod save;
mod settings;
mod structures;
mod submission;

use crate::errors::ReddExtractError;
use crate::extractor::Extractor;
use crate::save::save;
use crate::settings::Settings;
use crate::submission::Reddit;
use auth::Client;
use env_logger::Env;
use log::{debug, info};
use std::path::Path;

static POST_DATA_FILE: &str = "post_data.json";
static COMMENTS_FILE: &str = "comments.json";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ReddExtractError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env()?;

    info!("Initializing the Reddit client");
    let auth = Client::new(
        settings.reddit_client_id.expose(),
        settings.reddit_client_secret.expose(),
        &settings.reddit_user_agent,
    )
    .login()
    .await?;
    info!("Successfully authenticated with Reddit");
    debug!(
        "Access token expires in {} seconds (scope {})",
        auth.expires_in, auth.scope
    );

    let reddit = Reddit::new(auth, settings.reddit_user_agent.clone());

    info!("Extracting comments from {}", settings.post_url);
    let extractor = Extractor::new(&reddit, &settings.post_url);
    let (post_data, comments) = extractor.extract().await?;
    info!("Extracted {} comments", comments.comments.len());

    info!("Saving extracted data");
    save(
        &post_data,
        &comments,
        Path::new(POST_DATA_FILE),
        Path::new(COMMENTS_FILE),
    );

    Ok(())
}

use indicatif::ProgressBar;
use log::info;

use crate::errors::ReddExtractError;
use crate::structures::{Comment, CommentData, Comments, PostData, SubmissionData};
use crate::submission::Reddit;

/// Pulls one post and its fully expanded comment tree into output records.
pub struct Extractor<'a> {
    reddit: &'a Reddit,
    post_url: &'a str,
}

impl<'a> Extractor<'a> {
    pub fn new(reddit: &'a Reddit, post_url: &'a str) -> Self {
        Extractor { reddit, post_url }
    }

    /// Fetch the post named by the configured URL, expand every comment
    /// placeholder, and normalize the result.
    pub async fn extract(&self) -> Result<(PostData, Comments), ReddExtractError> {
        let post_id = post_id_from_url(self.post_url)?;
        info!("Fetching post {} and its comment tree", post_id);

        let mut submission = self.reddit.submission(post_id).await?;
        submission.replace_more(None).await?;

        let post_data = map_post(&submission.data);

        let listed = submission.comments.list();
        let progress = ProgressBar::new(listed.len() as u64);
        let mut records = Vec::with_capacity(listed.len());
        for (depth, data) in listed {
            records.push(map_comment(depth, data));
            progress.inc(1);
        }
        progress.finish_and_clear();

        Ok((post_data, Comments { comments: records }))
    }
}

/// The post id is the path segment right after `comments`.
fn post_id_from_url(url: &str) -> Result<&str, ReddExtractError> {
    let mut segments = url.split('/');
    while let Some(segment) = segments.next() {
        if segment == "comments" {
            return match segments.next() {
                Some(id) if !id.is_empty() => Ok(id),
                _ => Err(ReddExtractError::InvalidPostUrl(url.to_owned())),
            };
        }
    }

    Err(ReddExtractError::InvalidPostUrl(url.to_owned()))
}

fn map_post(data: &SubmissionData) -> PostData {
    PostData {
        id: data.id.clone(),
        title: data.title.clone(),
        created_utc: data.created_utc,
        score: data.score,
        num_comments: data.num_comments,
        url: data.url.clone(),
        selftext: data.selftext.clone(),
        subreddit: data.subreddit.clone(),
    }
}

fn map_comment(depth: u32, data: &CommentData) -> Comment {
    Comment {
        id: data.id.clone(),
        body: data.body.clone(),
        created_utc: data.created_utc,
        score: data.score,
        depth,
        parent_id: data.parent_id.clone(),
        permalink: data.permalink.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn post_id_is_the_segment_after_comments() {
        let url = "https://www.reddit.com/r/rust/comments/abc123/some_title/";
        assert_eq!(post_id_from_url(url).unwrap(), "abc123");
    }

    #[test]
    fn url_without_comments_segment_is_rejected() {
        for url in ["https://www.reddit.com/r/rust/", "https://redd.it/abc123"] {
            match post_id_from_url(url) {
                Err(ReddExtractError::InvalidPostUrl(reported)) => assert_eq!(reported, url),
                other => panic!("expected InvalidPostUrl, got {:?}", other),
            }
        }
    }

    #[test]
    fn comments_as_last_segment_is_rejected() {
        assert!(post_id_from_url("https://www.reddit.com/r/rust/comments").is_err());
        assert!(post_id_from_url("https://www.reddit.com/r/rust/comments/").is_err());
    }

    #[test]
    fn mapped_comment_keeps_wire_fields_and_computed_depth() {
        let data: CommentData = serde_json::from_value(json!({
            "id": "k9d2f",
            "body": "nested take",
            "created_utc": 1715003456.0,
            "score": -4,
            "parent_id": "t1_k9d1a",
            "permalink": "/r/rust/comments/abc123/some_title/k9d2f/",
            "replies": ""
        }))
        .unwrap();

        let record = map_comment(3, &data);
        assert_eq!(record.id, "k9d2f");
        assert_eq!(record.body, "nested take");
        assert_eq!(record.created_utc, 1715003456.0);
        assert_eq!(record.score, -4);
        assert_eq!(record.depth, 3);
        assert_eq!(record.parent_id, "t1_k9d1a");
        assert_eq!(record.permalink, "/r/rust/comments/abc123/some_title/k9d2f/");
    }

    #[test]
    fn mapping_preserves_traversal_order() {
        let listed: Vec<(u32, CommentData)> = ["c1", "c1a", "c1a1", "c2"]
            .iter()
            .zip([0u32, 1, 2, 0])
            .map(|(id, depth)| {
                let data = serde_json::from_value(json!({
                    "id": id,
                    "body": "text",
                    "created_utc": 1715000000.0,
                    "score": 1,
                    "parent_id": "t3_abc123",
                    "permalink": format!("/r/rust/comments/abc123/some_title/{}/", id)
                }))
                .unwrap();
                (depth, data)
            })
            .collect();

        let records: Vec<Comment> = listed
            .iter()
            .map(|(depth, data)| map_comment(*depth, data))
            .collect();

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        let depths: Vec<u32> = records.iter().map(|r| r.depth).collect();
        assert_eq!(ids, vec!["c1", "c1a", "c1a1", "c2"]);
        assert_eq!(depths, vec![0, 1, 2, 0]);
    }

    #[test]
    fn mapped_post_copies_every_field() {
        let data: SubmissionData = serde_json::from_value(json!({
            "id": "abc123",
            "title": "Some title",
            "created_utc": 1715000000.0,
            "score": 2412,
            "num_comments": 318,
            "url": "https://www.reddit.com/r/rust/comments/abc123/some_title/",
            "selftext": "Body text",
            "subreddit": "rust"
        }))
        .unwrap();

        let record = map_post(&data);
        assert_eq!(record.id, "abc123");
        assert_eq!(record.title, "Some title");
        assert_eq!(record.created_utc, 1715000000.0);
        assert_eq!(record.score, 2412);
        assert_eq!(record.num_comments, 318);
        assert_eq!(record.url, "https://www.reddit.com/r/rust/comments/abc123/some_title/");
        assert_eq!(record.selftext, "Body text");
        assert_eq!(record.subreddit, "rust");
    }
}

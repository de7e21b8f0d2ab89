use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{error, info};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::errors::ReddExtractError;
use crate::structures::{Comments, PostData};

/// Write both output files. A failed write is logged and does not stop the
/// other file from being attempted.
pub fn save(
    post_data: &PostData,
    comments: &Comments,
    post_data_path: &Path,
    comments_path: &Path,
) {
    match write_json(post_data, post_data_path) {
        Ok(()) => info!("Saved post data to {}", post_data_path.display()),
        Err(e) => error!(
            "Could not save post data to {}: {}",
            post_data_path.display(),
            e
        ),
    }

    match write_json(comments, comments_path) {
        Ok(()) => info!(
            "Saved {} comments to {}",
            comments.comments.len(),
            comments_path.display()
        ),
        Err(e) => error!(
            "Could not save comments to {}: {}",
            comments_path.display(),
            e
        ),
    }
}

/// Serialize a record to disk, pretty-printed with four-space indentation.
fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), ReddExtractError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let mut serializer = Serializer::with_formatter(writer, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    serializer.into_inner().flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::Comment;
    use std::fs;

    fn sample() -> (PostData, Comments) {
        let post_data = PostData {
            id: "abc123".to_owned(),
            title: "Some title".to_owned(),
            created_utc: 1715000000.0,
            score: 42,
            num_comments: 2,
            url: "https://www.reddit.com/r/rust/comments/abc123/some_title/".to_owned(),
            selftext: String::new(),
            subreddit: "rust".to_owned(),
        };
        let comments = Comments {
            comments: vec![
                Comment {
                    id: "c1".to_owned(),
                    body: "first".to_owned(),
                    created_utc: 1715000100.0,
                    score: 5,
                    depth: 0,
                    parent_id: "t3_abc123".to_owned(),
                    permalink: "/r/rust/comments/abc123/some_title/c1/".to_owned(),
                },
                Comment {
                    id: "c1a".to_owned(),
                    body: "a reply".to_owned(),
                    created_utc: 1715000200.0,
                    score: 2,
                    depth: 1,
                    parent_id: "t1_c1".to_owned(),
                    permalink: "/r/rust/comments/abc123/some_title/c1a/".to_owned(),
                },
            ],
        };
        (post_data, comments)
    }

    #[test]
    fn saves_both_files_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let post_data_path = dir.path().join("post_data.json");
        let comments_path = dir.path().join("comments.json");
        let (post_data, comments) = sample();

        save(&post_data, &comments, &post_data_path, &comments_path);

        let post_text = fs::read_to_string(&post_data_path).unwrap();
        let comments_text = fs::read_to_string(&comments_path).unwrap();
        assert!(post_text.starts_with("{\n    \"id\""));
        assert!(comments_text.starts_with("{\n    \"comments\": ["));
        assert!(comments_text.contains("\n        {"));

        let post_back: PostData = serde_json::from_str(&post_text).unwrap();
        let comments_back: Comments = serde_json::from_str(&comments_text).unwrap();
        assert_eq!(post_back, post_data);
        assert_eq!(comments_back, comments);
    }

    #[test]
    fn failed_write_does_not_abort_the_other_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "a regular file").unwrap();

        // Descending through a regular file fails for any user, root included.
        let post_data_path = blocker.join("post_data.json");
        let comments_path = dir.path().join("comments.json");
        let (post_data, comments) = sample();

        save(&post_data, &comments, &post_data_path, &comments_path);

        assert!(!post_data_path.exists());
        assert!(comments_path.exists());
        let comments_back: Comments =
            serde_json::from_str(&fs::read_to_string(&comments_path).unwrap()).unwrap();
        assert_eq!(comments_back, comments);
    }
}

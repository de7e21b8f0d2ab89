use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Wire format: what oauth.reddit.com sends back.
// Only the fields this program reads are modelled; serde skips the rest.
// ---------------------------------------------------------------------------

/// Envelope of a call to a 'listing' endpoint.
#[derive(Deserialize, Debug, Clone)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ListingData {
    /// Contains the data for the children of the listing.
    pub children: Vec<Thing>,
}

/// A single kinded object from the API. The kinds that can appear in a
/// comments listing are `t3` (the submission itself), `t1` (a comment) and
/// `more` (a placeholder for comments not included in the response).
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "kind", content = "data")]
pub enum Thing {
    #[serde(rename = "t3")]
    Submission(SubmissionData),
    #[serde(rename = "t1")]
    Comment(CommentData),
    #[serde(rename = "more")]
    More(MoreData),
}

/// Fields of a `t3` (link/self post) thing.
#[derive(Deserialize, Debug, Clone)]
pub struct SubmissionData {
    /// The ID of the post in base-36 form, as used in Reddit's links.
    pub id: String,
    pub title: String,
    /// A timestamp of the time when the post was created, in **UTC**.
    pub created_utc: f64,
    /// The overall points score of this post, as shown on the upvote
    /// counter. May be fuzzed by Reddit.
    pub score: i64,
    pub num_comments: i64,
    /// The linked URL for link posts, or the post's own URL for self posts.
    pub url: String,
    /// The self-post body. Empty string for link posts.
    pub selftext: String,
    pub subreddit: String,
}

/// Fields of a `t1` (comment) thing.
#[derive(Deserialize, Debug, Clone)]
pub struct CommentData {
    pub id: String,
    pub body: String,
    pub created_utc: f64,
    pub score: i64,
    /// The full 'Thing ID' of the parent: `t3_…` when the parent is the
    /// submission, `t1_…` when it is another comment.
    pub parent_id: String,
    /// The permanent path for this comment.
    pub permalink: String,
    /// Nested replies. The API sends an empty string instead of a listing
    /// when there are none, and omits the field entirely in morechildren
    /// responses.
    #[serde(default)]
    pub replies: Option<MaybeReplies>,
}

/// Fields of a `more` thing. An empty `children` list marks a
/// "continue this thread" placeholder.
#[derive(Deserialize, Debug, Clone)]
pub struct MoreData {
    pub id: String,
    pub parent_id: String,
    /// Rough number of comments hidden behind this placeholder.
    pub count: i64,
    pub children: Vec<String>,
}

/// The `replies` field of a comment: either a nested listing or `""`.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum MaybeReplies {
    Listing(Listing),
    Empty(String),
}

/// Envelope of a call to `/api/morechildren`.
#[derive(Deserialize, Debug)]
pub struct MoreChildren {
    pub json: MoreChildrenBody,
}

#[derive(Deserialize, Debug)]
pub struct MoreChildrenBody {
    #[serde(default)]
    pub errors: Vec<Value>,
    pub data: Option<MoreChildrenData>,
}

#[derive(Deserialize, Debug)]
pub struct MoreChildrenData {
    #[serde(default)]
    pub things: Vec<Thing>,
}

// ---------------------------------------------------------------------------
// Output records: what ends up in post_data.json and comments.json.
// ---------------------------------------------------------------------------

/// Metadata of the extracted post. Built once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostData {
    pub id: String,
    pub title: String,
    pub created_utc: f64,
    pub score: i64,
    pub num_comments: i64,
    pub url: String,
    pub selftext: String,
    pub subreddit: String,
}

/// One flattened comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub body: String,
    pub created_utc: f64,
    pub score: i64,
    /// Distance from the submission root; 0 for direct replies to the post.
    pub depth: u32,
    /// Fullname of the parent (`t3_…` post or `t1_…` comment), as sent by
    /// the API.
    pub parent_id: String,
    pub permalink: String,
}

/// All extracted comments, in flattening-traversal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comments {
    pub comments: Vec<Comment>,
}

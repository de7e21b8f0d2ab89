use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use indicatif::ProgressBar;
use log::{debug, warn};
use reqwest::header::USER_AGENT;
use serde::de::DeserializeOwned;

use crate::auth::Auth;
use crate::errors::ReddExtractError;
use crate::structures::{
    CommentData, Listing, MaybeReplies, MoreChildren, MoreData, SubmissionData, Thing,
};

static OAUTH_URL: &str = "https://oauth.reddit.com";

/// Page size of the morechildren endpoint.
const MORE_CHILDREN_BATCH: usize = 100;

/// Handle for authenticated calls against the Reddit API.
pub struct Reddit {
    auth: Auth,
    user_agent: String,
    http: reqwest::Client,
}

impl Reddit {
    pub fn new(auth: Auth, user_agent: String) -> Self {
        Reddit {
            auth,
            user_agent,
            http: reqwest::Client::new(),
        }
    }

    /// Fetch a submission by id, together with the first page of its comment
    /// tree. The endpoint answers with a two-listing array: the submission
    /// itself, then the top-level comments.
    pub async fn submission(&self, id: &str) -> Result<Submission<'_>, ReddExtractError> {
        let url = format!("{}/comments/{}", OAUTH_URL, id);
        let (submission, comments): (Listing, Listing) = self.get_json(&url, &[]).await?;

        let data = submission
            .data
            .children
            .into_iter()
            .find_map(|thing| match thing {
                Thing::Submission(data) => Some(data),
                _ => None,
            })
            .ok_or_else(|| {
                ReddExtractError::UnexpectedResponse(format!(
                    "no submission in the listing for `{}`",
                    id
                ))
            })?;

        let mut forest = CommentForest::default();
        forest.absorb(comments.data.children);
        debug!(
            "Submission {} arrived with {} comments and {} placeholders",
            data.id,
            forest.len(),
            forest.pending_count()
        );

        Ok(Submission {
            client: self,
            data,
            comments: forest,
        })
    }

    async fn get_json<T>(&self, url: &str, query: &[(&str, &str)]) -> Result<T, ReddExtractError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.auth.access_token)
            .header(USER_AGENT, &self.user_agent)
            .query(&[("raw_json", "1")])
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;

        Ok(response)
    }

    /// Resolve comment ids hidden behind a placeholder. Returned things are
    /// flat: every comment carries its parent id, and further placeholders
    /// may be mixed in.
    async fn more_children(
        &self,
        link_fullname: &str,
        children: &[String],
    ) -> Result<Vec<Thing>, ReddExtractError> {
        let url = format!("{}/api/morechildren", OAUTH_URL);
        let mut things = Vec::new();

        for batch in children.chunks(MORE_CHILDREN_BATCH) {
            let ids = batch.join(",");
            let response: MoreChildren = self
                .get_json(
                    &url,
                    &[
                        ("api_type", "json"),
                        ("link_id", link_fullname),
                        ("children", ids.as_str()),
                    ],
                )
                .await?;

            if !response.json.errors.is_empty() {
                return Err(ReddExtractError::UnexpectedResponse(format!(
                    "morechildren failed: {:?}",
                    response.json.errors
                )));
            }
            things.extend(response.json.data.map(|data| data.things).unwrap_or_default());
        }

        Ok(things)
    }

    /// Fetch the subtree rooted at a single comment. Used for
    /// "continue this thread" placeholders, which carry no child ids.
    async fn comment_subtree(
        &self,
        post_id: &str,
        comment_id: &str,
    ) -> Result<Vec<Thing>, ReddExtractError> {
        let url = format!("{}/comments/{}", OAUTH_URL, post_id);
        let (_, comments): (Listing, Listing) =
            self.get_json(&url, &[("comment", comment_id)]).await?;

        Ok(comments.data.children)
    }
}

/// One fetched submission and its comment tree.
pub struct Submission<'a> {
    client: &'a Reddit,
    pub data: SubmissionData,
    pub comments: CommentForest,
}

impl Submission<'_> {
    /// Replace `more` placeholders with the comments they stand for.
    /// `limit` caps how many placeholders are processed; `None` processes
    /// them all. Placeholders past the cap are removed from the tree and
    /// handed back.
    pub async fn replace_more(
        &mut self,
        limit: Option<usize>,
    ) -> Result<Vec<MoreData>, ReddExtractError> {
        let link_fullname = format!("t3_{}", self.data.id);
        let mut continued = HashSet::new();
        let mut skipped = Vec::new();
        let mut processed = 0usize;

        let spinner = ProgressBar::new_spinner();
        spinner.enable_steady_tick(Duration::from_millis(120));

        while let Some(more) = self.comments.pop_pending() {
            if limit.map_or(false, |cap| processed >= cap) {
                skipped.push(more);
                continue;
            }
            processed += 1;
            spinner.set_message(format!(
                "Expanding comment tree: {} placeholders processed, {} queued",
                processed,
                self.comments.pending_count()
            ));
            debug!(
                "Placeholder {} hides about {} comments",
                more.id, more.count
            );

            if more.children.is_empty() {
                // "continue this thread": refetch the tree from the parent
                // comment down and merge it in.
                let parent = match more.parent_id.strip_prefix("t1_") {
                    Some(parent) => parent.to_owned(),
                    None => {
                        warn!(
                            "Placeholder {} continues from {}, which is not a comment",
                            more.id, more.parent_id
                        );
                        continue;
                    }
                };
                if !continued.insert(parent.clone()) {
                    warn!(
                        "Thread below comment {} was already continued once, dropping placeholder",
                        parent
                    );
                    continue;
                }
                let things = self.client.comment_subtree(&self.data.id, &parent).await?;
                self.comments.absorb(things);
            } else {
                let things = self
                    .client
                    .more_children(&link_fullname, &more.children)
                    .await?;
                self.comments.absorb(things);
            }
        }

        spinner.finish_and_clear();
        if processed > 0 {
            debug!("Resolved {} comment placeholders", processed);
        }

        Ok(skipped)
    }
}

/// Order-preserving storage for a comment tree. Comments attach to their
/// parents as they arrive; `more` placeholders queue up for
/// [`Submission::replace_more`].
#[derive(Debug, Default)]
pub struct CommentForest {
    roots: Vec<String>,
    nodes: HashMap<String, CommentData>,
    children: HashMap<String, Vec<String>>,
    pending: VecDeque<MoreData>,
}

impl CommentForest {
    /// Number of comments currently in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of unresolved `more` placeholders.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Flatten the tree depth-first, yielding each comment with its depth.
    /// Siblings keep their arrival order.
    pub fn list(&self) -> Vec<(u32, &CommentData)> {
        let mut flattened = Vec::with_capacity(self.nodes.len());
        for id in &self.roots {
            self.walk(id, 0, &mut flattened);
        }
        flattened
    }

    fn walk<'a>(&'a self, id: &str, depth: u32, out: &mut Vec<(u32, &'a CommentData)>) {
        if let Some(data) = self.nodes.get(id) {
            out.push((depth, data));
            if let Some(kids) = self.children.get(id) {
                for kid in kids {
                    self.walk(kid, depth + 1, out);
                }
            }
        }
    }

    fn pop_pending(&mut self) -> Option<MoreData> {
        self.pending.pop_front()
    }

    /// Take in a batch of listing children, nested or flat.
    fn absorb(&mut self, things: Vec<Thing>) {
        for thing in things {
            match thing {
                Thing::Comment(data) => self.insert(data),
                Thing::More(data) => self.pending.push_back(data),
                Thing::Submission(data) => {
                    warn!("Ignoring submission {} inside a comment listing", data.id)
                }
            }
        }
    }

    fn insert(&mut self, mut data: CommentData) {
        let replies = data.replies.take();

        if !self.nodes.contains_key(&data.id) {
            if data.parent_id.starts_with("t3_") {
                self.roots.push(data.id.clone());
            } else if let Some(parent) = data.parent_id.strip_prefix("t1_") {
                if self.nodes.contains_key(parent) {
                    self.children
                        .entry(parent.to_owned())
                        .or_default()
                        .push(data.id.clone());
                } else {
                    warn!(
                        "Dropping comment {} with unknown parent {}",
                        data.id, data.parent_id
                    );
                    return;
                }
            } else {
                warn!(
                    "Dropping comment {} with unrecognized parent {}",
                    data.id, data.parent_id
                );
                return;
            }
            self.nodes.insert(data.id.clone(), data);
        }

        // A subtree refetch hands back comments the forest already knows;
        // only their replies are news.
        if let Some(MaybeReplies::Listing(listing)) = replies {
            self.absorb(listing.data.children);
        }
    }
}

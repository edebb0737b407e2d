/// Post service - handles post creation, retrieval, tagging and polls
use crate::db::{post_repo, tag_repo};
use crate::error::{AppError, Result};
use crate::models::{
    CreatePostRequest, PageParams, Paginated, PollOptionResult, PollResults, Post, PostFilter,
    PostType, UpdatePostRequest,
};
use actix_middleware::AuthUser;
use sqlx::{PgConnection, PgPool};
use std::collections::HashSet;
use uuid::Uuid;

pub const MAX_TAGS_PER_POST: usize = 10;
pub const MAX_TAG_LENGTH: usize = 50;
pub const MIN_POLL_OPTIONS: usize = 2;
pub const MAX_POLL_OPTIONS: usize = 10;
const MAX_POLL_OPTION_LENGTH: usize = 200;

/// Trim, strip a leading `#`, lowercase and dedupe tag names (first occurrence wins).
pub fn normalize_tags(raw: &[String]) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut tags = Vec::with_capacity(raw.len());

    for tag in raw {
        let name = tag.trim().trim_start_matches('#').trim().to_lowercase();
        if name.is_empty()
            || name.chars().count() > MAX_TAG_LENGTH
            || name.chars().any(char::is_whitespace)
        {
            return Err(AppError::bad_request(
                "INVALID_TAG",
                format!("Invalid tag '{}'", tag.trim()),
            ));
        }
        if seen.insert(name.clone()) {
            tags.push(name);
        }
    }

    if tags.len() > MAX_TAGS_PER_POST {
        return Err(AppError::bad_request(
            "TOO_MANY_TAGS",
            format!("A post can have at most {MAX_TAGS_PER_POST} tags"),
        ));
    }
    Ok(tags)
}

/// Polls need 2-10 non-empty options; other post types must not carry any.
pub fn validate_poll_options(
    post_type: PostType,
    options: Option<&[String]>,
) -> Result<Option<Vec<String>>> {
    let invalid = |message: String| AppError::bad_request("INVALID_POLL_OPTIONS", message);

    match (post_type, options) {
        (PostType::Poll, None) => Err(invalid(format!(
            "Polls need between {MIN_POLL_OPTIONS} and {MAX_POLL_OPTIONS} options"
        ))),
        (PostType::Poll, Some(options)) => {
            let cleaned: Vec<String> = options.iter().map(|o| o.trim().to_string()).collect();
            if !(MIN_POLL_OPTIONS..=MAX_POLL_OPTIONS).contains(&cleaned.len()) {
                return Err(invalid(format!(
                    "Polls need between {MIN_POLL_OPTIONS} and {MAX_POLL_OPTIONS} options"
                )));
            }
            if cleaned
                .iter()
                .any(|o| o.is_empty() || o.chars().count() > MAX_POLL_OPTION_LENGTH)
            {
                return Err(invalid(format!(
                    "Poll options must be 1-{MAX_POLL_OPTION_LENGTH} characters"
                )));
            }
            Ok(Some(cleaned))
        }
        (_, Some(_)) => Err(invalid("Only polls can have poll options".to_string())),
        (_, None) => Ok(None),
    }
}

fn post_not_found() -> AppError {
    AppError::not_found("POST_NOT_FOUND", "Post not found")
}

fn not_a_poll() -> AppError {
    AppError::bad_request("NOT_A_POLL", "Post is not a poll")
}

/// Everything a tag write will lock: the new set plus whatever is linked now,
/// deduped and in name order.
pub fn tag_lock_set(new_tags: &[String], current: &[String]) -> Vec<String> {
    let mut names: Vec<String> = new_tags.iter().chain(current).cloned().collect();
    names.sort();
    names.dedup();
    names
}

/// Upsert the lock set in one statement, then link the post to `tags`.
async fn attach_tags(
    conn: &mut PgConnection,
    post_id: Uuid,
    tags: &[String],
    current: &[String],
) -> Result<()> {
    let locked = tag_repo::upsert_tags(&mut *conn, &tag_lock_set(tags, current)).await?;

    let mut ids: Vec<(&str, Uuid)> = locked
        .iter()
        .filter(|(_, name)| tags.contains(name))
        .map(|(id, name)| (name.as_str(), *id))
        .collect();
    ids.sort();

    for (_, tag_id) in ids {
        tag_repo::attach_tag(&mut *conn, post_id, tag_id).await?;
    }
    Ok(())
}

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_post(&self, author_id: Uuid, req: &CreatePostRequest) -> Result<Post> {
        let poll_options = validate_poll_options(req.post_type, req.poll_options.as_deref())?;
        let tags = normalize_tags(req.tags.as_deref().unwrap_or_default())?;

        let mut tx = self.pool.begin().await?;

        let post_id = post_repo::insert_post(
            &mut tx,
            post_repo::NewPost {
                author_id,
                post_type: req.post_type.as_str(),
                title: req.title.trim(),
                content: &req.content,
                media_url: req.media_url.as_deref(),
                poll_options: poll_options.as_deref(),
            },
        )
        .await?;
        if !tags.is_empty() {
            attach_tags(&mut tx, post_id, &tags, &[]).await?;
        }

        let post = post_repo::find_post(&mut *tx, post_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("post {post_id} vanished after insert")))?;

        tx.commit().await?;

        tracing::info!(%post_id, %author_id, post_type = req.post_type.as_str(), "post created");
        Ok(post)
    }

    /// Fetch a post and count the view.
    pub async fn view_post(&self, post_id: Uuid) -> Result<Post> {
        if !post_repo::increment_view_count(&self.pool, post_id).await? {
            return Err(post_not_found());
        }
        post_repo::find_post(&self.pool, post_id)
            .await?
            .ok_or_else(post_not_found)
    }

    pub async fn list_posts(&self, filter: &PostFilter) -> Result<Paginated<Post>> {
        let params = filter.pagination();
        let items =
            post_repo::list_posts(&self.pool, filter, params.limit(), params.offset()).await?;
        let total = post_repo::count_posts(&self.pool, filter).await?;
        Ok(Paginated::new(items, params, total))
    }

    pub async fn update_post(
        &self,
        user: &AuthUser,
        post_id: Uuid,
        req: &UpdatePostRequest,
    ) -> Result<Post> {
        let tags = req.tags.as_deref().map(normalize_tags).transpose()?;

        let mut tx = self.pool.begin().await?;

        let post = post_repo::lock_post(&mut tx, post_id)
            .await?
            .ok_or_else(post_not_found)?;
        if post.author_id != user.user_id {
            return Err(AppError::forbidden("Only the author can edit this post"));
        }

        post_repo::update_post(
            &mut tx,
            post_id,
            req.title.as_deref().map(str::trim),
            req.content.as_deref(),
            req.media_url.as_deref(),
        )
        .await?;

        if let Some(tags) = tags {
            // lock kept and dropped tags together before touching counters
            let current = tag_repo::post_tag_names(&mut tx, post_id).await?;
            if !tags.is_empty() || !current.is_empty() {
                attach_tags(&mut tx, post_id, &tags, &current).await?;
                tag_repo::detach_tags_except(&mut tx, post_id, &tags).await?;
            }
        }

        let updated = post_repo::find_post(&mut *tx, post_id)
            .await?
            .ok_or_else(post_not_found)?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn delete_post(&self, user: &AuthUser, post_id: Uuid) -> Result<()> {
        let post = post_repo::find_post_ref(&self.pool, post_id)
            .await?
            .ok_or_else(post_not_found)?;
        user.require_owner_or_admin(post.author_id)?;

        if !post_repo::soft_delete_post(&self.pool, post_id).await? {
            return Err(post_not_found());
        }
        tracing::info!(%post_id, deleted_by = %user.user_id, "post deleted");
        Ok(())
    }

    pub async fn feed(&self, user_id: Uuid, params: PageParams) -> Result<Paginated<Post>> {
        let items =
            post_repo::feed_posts(&self.pool, user_id, params.limit(), params.offset()).await?;
        let total = post_repo::count_feed(&self.pool, user_id).await?;
        Ok(Paginated::new(items, params, total))
    }

    pub async fn vote(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        option_index: i32,
    ) -> Result<PollResults> {
        let post = post_repo::find_post_ref(&self.pool, post_id)
            .await?
            .ok_or_else(post_not_found)?;
        let options = post.poll_options.as_deref().ok_or_else(not_a_poll)?;

        let in_range = usize::try_from(option_index).is_ok_and(|i| i < options.len());
        if !in_range {
            return Err(AppError::bad_request(
                "INVALID_OPTION",
                format!("Option index must be between 0 and {}", options.len().saturating_sub(1)),
            ));
        }

        if !post_repo::insert_poll_vote(&self.pool, post_id, user_id, option_index).await? {
            return Err(AppError::bad_request(
                "ALREADY_VOTED",
                "You have already voted on this poll",
            ));
        }

        self.poll_results(post_id, Some(user_id)).await
    }

    pub async fn poll_results(&self, post_id: Uuid, viewer_id: Option<Uuid>) -> Result<PollResults> {
        let post = post_repo::find_post_ref(&self.pool, post_id)
            .await?
            .ok_or_else(post_not_found)?;
        let labels = post.poll_options.ok_or_else(not_a_poll)?;

        let counts = post_repo::poll_vote_counts(&self.pool, post_id).await?;
        let my_vote = match viewer_id {
            Some(viewer) => post_repo::find_poll_vote(&self.pool, post_id, viewer).await?,
            None => None,
        };

        Ok(tally_poll(post_id, labels, &counts, my_vote))
    }
}

/// Zero-fill vote counts so every option appears in order.
pub fn tally_poll(
    post_id: Uuid,
    labels: Vec<String>,
    counts: &[(i32, i64)],
    my_vote: Option<i32>,
) -> PollResults {
    let options: Vec<PollOptionResult> = labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| {
            let index = i as i32;
            let votes = counts
                .iter()
                .find(|(idx, _)| *idx == index)
                .map(|(_, n)| *n)
                .unwrap_or(0);
            PollOptionResult { index, label, votes }
        })
        .collect();
    let total_votes = options.iter().map(|o| o.votes).sum();

    PollResults {
        post_id,
        options,
        total_votes,
        my_vote,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn tags_are_normalized_and_deduped() {
        let tags = normalize_tags(&strings(&["#Rust", " rust ", "Databases", "#sql"])).unwrap();
        assert_eq!(tags, strings(&["rust", "databases", "sql"]));
    }

    #[test]
    fn empty_or_spaced_tags_are_rejected() {
        assert_eq!(normalize_tags(&strings(&["#"])).unwrap_err().code(), "INVALID_TAG");
        assert_eq!(
            normalize_tags(&strings(&["machine learning"])).unwrap_err().code(),
            "INVALID_TAG"
        );
        let long = "a".repeat(MAX_TAG_LENGTH + 1);
        assert_eq!(normalize_tags(&[long]).unwrap_err().code(), "INVALID_TAG");
    }

    #[test]
    fn more_than_ten_distinct_tags_rejected() {
        let many: Vec<String> = (0..11).map(|i| format!("tag{i}")).collect();
        assert_eq!(normalize_tags(&many).unwrap_err().code(), "TOO_MANY_TAGS");

        // duplicates collapse before the limit applies
        let mut repeated: Vec<String> = (0..10).map(|i| format!("tag{i}")).collect();
        repeated.push("TAG0".to_string());
        assert_eq!(normalize_tags(&repeated).unwrap().len(), 10);
    }

    #[test]
    fn tag_lock_order_ignores_request_order() {
        let forward = normalize_tags(&strings(&["rust", "sql", "async"])).unwrap();
        let reversed = normalize_tags(&strings(&["async", "sql", "rust"])).unwrap();
        assert_ne!(forward, reversed);
        assert_eq!(tag_lock_set(&forward, &[]), tag_lock_set(&reversed, &[]));
        assert_eq!(tag_lock_set(&forward, &[]), strings(&["async", "rust", "sql"]));
    }

    #[test]
    fn tag_lock_set_covers_dropped_tags_once() {
        let set = tag_lock_set(&strings(&["sql", "rust"]), &strings(&["rust", "go"]));
        assert_eq!(set, strings(&["go", "rust", "sql"]));
    }

    #[test]
    fn polls_need_two_to_ten_options() {
        let one = strings(&["yes"]);
        assert_eq!(
            validate_poll_options(PostType::Poll, Some(&one)).unwrap_err().code(),
            "INVALID_POLL_OPTIONS"
        );
        assert!(validate_poll_options(PostType::Poll, None).is_err());

        let eleven: Vec<String> = (0..11).map(|i| format!("option {i}")).collect();
        assert!(validate_poll_options(PostType::Poll, Some(&eleven)).is_err());

        let ok = strings(&[" yes ", "no"]);
        assert_eq!(
            validate_poll_options(PostType::Poll, Some(&ok)).unwrap(),
            Some(strings(&["yes", "no"]))
        );
    }

    #[test]
    fn blank_poll_option_rejected() {
        let blank = strings(&["yes", "   "]);
        assert!(validate_poll_options(PostType::Poll, Some(&blank)).is_err());
    }

    #[test]
    fn non_polls_cannot_carry_options() {
        let opts = strings(&["a", "b"]);
        assert_eq!(
            validate_poll_options(PostType::Article, Some(&opts)).unwrap_err().code(),
            "INVALID_POLL_OPTIONS"
        );
        assert_eq!(validate_poll_options(PostType::Question, None).unwrap(), None);
    }

    #[test]
    fn tally_zero_fills_missing_options() {
        let post_id = Uuid::new_v4();
        let results = tally_poll(post_id, strings(&["a", "b", "c"]), &[(0, 3), (2, 1)], Some(2));

        let votes: Vec<i64> = results.options.iter().map(|o| o.votes).collect();
        assert_eq!(votes, vec![3, 0, 1]);
        assert_eq!(results.total_votes, 4);
        assert_eq!(results.my_vote, Some(2));
        assert_eq!(results.options[1].label, "b");
    }
}

/// Comment service - threaded comments on posts
use crate::db::{comment_repo, notification_repo, post_repo};
use crate::error::{AppError, Result};
use crate::models::{Comment, NewNotification, NotificationKind, PageParams, Paginated};
use actix_middleware::AuthUser;
use sqlx::PgPool;
use uuid::Uuid;

fn post_not_found() -> AppError {
    AppError::not_found("POST_NOT_FOUND", "Post not found")
}

fn comment_not_found() -> AppError {
    AppError::not_found("COMMENT_NOT_FOUND", "Comment not found")
}

/// A reply's parent must exist on the same post.
pub fn check_parent(post_id: Uuid, parent_post_id: Option<Uuid>) -> Result<()> {
    match parent_post_id {
        Some(id) if id == post_id => Ok(()),
        _ => Err(AppError::bad_request(
            "INVALID_PARENT_COMMENT",
            "Parent comment does not belong to this post",
        )),
    }
}

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        parent_id: Option<Uuid>,
        content: &str,
    ) -> Result<Comment> {
        let mut tx = self.pool.begin().await?;

        let post = post_repo::lock_post(&mut tx, post_id)
            .await?
            .ok_or_else(post_not_found)?;

        if let Some(parent_id) = parent_id {
            let parent_post = comment_repo::find_comment_post(&mut tx, parent_id).await?;
            check_parent(post_id, parent_post)?;
        }

        let comment =
            comment_repo::insert_comment(&mut tx, post_id, author_id, parent_id, content.trim())
                .await?;
        post_repo::increment_comment_count(&mut tx, post_id).await?;

        if post.author_id != author_id {
            notification_repo::create_notification(
                &mut *tx,
                &NewNotification {
                    user_id: post.author_id,
                    actor_id: Some(author_id),
                    kind: NotificationKind::Comment,
                    post_id: Some(post_id),
                    message: format!("{} commented on your post", comment.author_username),
                },
            )
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(comment_id = %comment.id, %post_id, "comment created");
        Ok(comment)
    }

    pub async fn list_comments(&self, post_id: Uuid, params: PageParams) -> Result<Paginated<Comment>> {
        post_repo::find_post_ref(&self.pool, post_id)
            .await?
            .ok_or_else(post_not_found)?;

        let items =
            comment_repo::list_comments(&self.pool, post_id, params.limit(), params.offset())
                .await?;
        let total = comment_repo::count_comments(&self.pool, post_id).await?;
        Ok(Paginated::new(items, params, total))
    }

    /// Only the author may edit a comment.
    pub async fn update_comment(
        &self,
        user: &AuthUser,
        comment_id: Uuid,
        content: &str,
    ) -> Result<Comment> {
        let comment = comment_repo::find_comment(&self.pool, comment_id)
            .await?
            .ok_or_else(comment_not_found)?;
        if comment.author_id != user.user_id {
            return Err(AppError::forbidden("Only the author can edit this comment"));
        }

        comment_repo::update_comment(&self.pool, comment_id, content.trim())
            .await?
            .ok_or_else(comment_not_found)
    }

    pub async fn delete_comment(&self, user: &AuthUser, comment_id: Uuid) -> Result<()> {
        let comment = comment_repo::find_comment(&self.pool, comment_id)
            .await?
            .ok_or_else(comment_not_found)?;
        user.require_owner_or_admin(comment.author_id)?;

        let mut tx = self.pool.begin().await?;
        post_repo::lock_post(&mut tx, comment.post_id)
            .await?
            .ok_or_else(post_not_found)?;
        if !comment_repo::delete_comment(&mut tx, comment_id).await? {
            return Err(comment_not_found());
        }
        post_repo::recount_comments(&mut tx, comment.post_id).await?;
        tx.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_on_same_post_is_accepted() {
        let post = Uuid::new_v4();
        assert!(check_parent(post, Some(post)).is_ok());
    }

    #[test]
    fn parent_on_other_post_or_missing_is_rejected() {
        let post = Uuid::new_v4();
        assert_eq!(
            check_parent(post, Some(Uuid::new_v4())).unwrap_err().code(),
            "INVALID_PARENT_COMMENT"
        );
        assert_eq!(
            check_parent(post, None).unwrap_err().code(),
            "INVALID_PARENT_COMMENT"
        );
    }
}

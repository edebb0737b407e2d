/// Follow service - directed follow edges between users
use crate::db::{follow_repo, notification_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::{FollowEntry, NewNotification, NotificationKind, PageParams, Paginated};
use sqlx::PgPool;
use uuid::Uuid;

pub fn ensure_not_self(follower_id: Uuid, followee_id: Uuid) -> Result<()> {
    if follower_id == followee_id {
        return Err(AppError::bad_request(
            "CANNOT_FOLLOW_SELF",
            "You cannot follow yourself",
        ));
    }
    Ok(())
}

pub struct FollowService {
    pool: PgPool,
}

impl FollowService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<()> {
        ensure_not_self(follower_id, followee_id)?;

        if !user_repo::user_exists(&self.pool, followee_id).await? {
            return Err(AppError::not_found("USER_NOT_FOUND", "User not found"));
        }

        let mut tx = self.pool.begin().await?;

        if !follow_repo::insert_follow(&mut tx, follower_id, followee_id).await? {
            return Err(AppError::bad_request(
                "ALREADY_FOLLOWING",
                "You are already following this user",
            ));
        }

        notification_repo::create_notification(
            &mut *tx,
            &NewNotification {
                user_id: followee_id,
                actor_id: Some(follower_id),
                kind: NotificationKind::Follow,
                post_id: None,
                message: "You have a new follower".to_string(),
            },
        )
        .await?;

        tx.commit().await?;

        tracing::debug!(%follower_id, %followee_id, "follow created");
        Ok(())
    }

    pub async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<()> {
        if !follow_repo::delete_follow(&self.pool, follower_id, followee_id).await? {
            return Err(AppError::not_found(
                "NOT_FOLLOWING",
                "You are not following this user",
            ));
        }
        Ok(())
    }

    pub async fn followers(
        &self,
        user_id: Uuid,
        params: PageParams,
    ) -> Result<Paginated<FollowEntry>> {
        self.ensure_user(user_id).await?;
        let items =
            follow_repo::list_followers(&self.pool, user_id, params.limit(), params.offset())
                .await?;
        let total = follow_repo::count_followers(&self.pool, user_id).await?;
        Ok(Paginated::new(items, params, total))
    }

    pub async fn following(
        &self,
        user_id: Uuid,
        params: PageParams,
    ) -> Result<Paginated<FollowEntry>> {
        self.ensure_user(user_id).await?;
        let items =
            follow_repo::list_following(&self.pool, user_id, params.limit(), params.offset())
                .await?;
        let total = follow_repo::count_following(&self.pool, user_id).await?;
        Ok(Paginated::new(items, params, total))
    }

    async fn ensure_user(&self, user_id: Uuid) -> Result<()> {
        if user_repo::user_exists(&self.pool, user_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("USER_NOT_FOUND", "User not found"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_self_follow() {
        let id = Uuid::new_v4();
        let err = ensure_not_self(id, id).unwrap_err();
        assert_eq!(err.code(), "CANNOT_FOLLOW_SELF");
    }

    #[test]
    fn allows_following_someone_else() {
        assert!(ensure_not_self(Uuid::new_v4(), Uuid::new_v4()).is_ok());
    }
}

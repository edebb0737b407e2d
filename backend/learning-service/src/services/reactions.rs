/// Reaction service - one typed reaction per user and post
use crate::db::{notification_repo, post_repo, reaction_repo};
use crate::error::{AppError, Result};
use crate::models::{NewNotification, NotificationKind, Reaction, ReactionSummary, ReactionType};
use sqlx::PgPool;
use std::collections::BTreeMap;
use uuid::Uuid;

fn post_not_found() -> AppError {
    AppError::not_found("POST_NOT_FOUND", "Post not found")
}

/// Counts for every reaction type, zero when unused.
pub fn summarize(
    post_id: Uuid,
    counts: &[(String, i64)],
    my_reaction: Option<String>,
) -> ReactionSummary {
    let mut by_type: BTreeMap<String, i64> = ReactionType::ALL
        .iter()
        .map(|t| (t.as_str().to_string(), 0))
        .collect();
    for (kind, count) in counts {
        *by_type.entry(kind.clone()).or_insert(0) += count;
    }

    ReactionSummary {
        post_id,
        total: by_type.values().sum(),
        counts: by_type,
        my_reaction,
    }
}

pub struct ReactionService {
    pool: PgPool,
}

impl ReactionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a reaction, or switch the type of an existing one.
    pub async fn react(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        reaction_type: ReactionType,
    ) -> Result<Reaction> {
        let mut tx = self.pool.begin().await?;

        let post = post_repo::lock_post(&mut tx, post_id)
            .await?
            .ok_or_else(post_not_found)?;

        let reaction = match reaction_repo::find_reaction(&mut tx, post_id, user_id).await? {
            Some(existing) => {
                reaction_repo::update_reaction_type(&mut tx, existing.id, reaction_type.as_str())
                    .await?
            }
            None => {
                let created =
                    reaction_repo::insert_reaction(&mut tx, post_id, user_id, reaction_type.as_str())
                        .await?;
                post_repo::adjust_reaction_count(&mut tx, post_id, 1).await?;

                if post.author_id != user_id {
                    notification_repo::create_notification(
                        &mut *tx,
                        &NewNotification {
                            user_id: post.author_id,
                            actor_id: Some(user_id),
                            kind: NotificationKind::Reaction,
                            post_id: Some(post_id),
                            message: format!(
                                "Someone reacted '{}' to your post",
                                reaction_type.as_str()
                            ),
                        },
                    )
                    .await?;
                }
                created
            }
        };

        tx.commit().await?;
        Ok(reaction)
    }

    pub async fn remove(&self, post_id: Uuid, user_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        post_repo::lock_post(&mut tx, post_id)
            .await?
            .ok_or_else(post_not_found)?;

        if !reaction_repo::delete_reaction(&mut tx, post_id, user_id).await? {
            return Err(AppError::not_found(
                "REACTION_NOT_FOUND",
                "You have not reacted to this post",
            ));
        }
        post_repo::adjust_reaction_count(&mut tx, post_id, -1).await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn summary(&self, post_id: Uuid, viewer_id: Option<Uuid>) -> Result<ReactionSummary> {
        post_repo::find_post_ref(&self.pool, post_id)
            .await?
            .ok_or_else(post_not_found)?;

        let counts = reaction_repo::reaction_counts(&self.pool, post_id).await?;
        let mine = match viewer_id {
            Some(viewer) => {
                reaction_repo::find_user_reaction_type(&self.pool, post_id, viewer).await?
            }
            None => None,
        };

        Ok(summarize(post_id, &counts, mine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_every_type() {
        let summary = summarize(
            Uuid::new_v4(),
            &[("like".to_string(), 4), ("helpful".to_string(), 2)],
            Some("like".to_string()),
        );

        assert_eq!(summary.counts.len(), ReactionType::ALL.len());
        assert_eq!(summary.counts["like"], 4);
        assert_eq!(summary.counts["helpful"], 2);
        assert_eq!(summary.counts["love"], 0);
        assert_eq!(summary.total, 6);
        assert_eq!(summary.my_reaction.as_deref(), Some("like"));
    }

    #[test]
    fn empty_post_has_zero_total() {
        let summary = summarize(Uuid::new_v4(), &[], None);
        assert_eq!(summary.total, 0);
        assert!(summary.counts.values().all(|c| *c == 0));
    }
}

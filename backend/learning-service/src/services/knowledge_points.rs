/// Knowledge point service - capped per-awarder point grants on posts
///
/// Each awarder may give a post at most `MAX_POINTS_PER_AWARDER` points in
/// total, in steps of `POINTS_STEP`. The whole grant runs in one transaction
/// holding a row lock on the post, so concurrent awards from the same user
/// queue behind each other and the budget check always sees committed sums.
use crate::db::{knowledge_repo, notification_repo, post_repo};
use crate::error::{AppError, Result};
use crate::metrics::learning::record_award;
use crate::models::{
    AwardPointsResponse, KnowledgePointsSummary, NewNotification, NotificationKind,
};
use sqlx::PgPool;
use uuid::Uuid;

pub const MAX_POINTS_PER_AWARDER: i64 = 100;
pub const POINTS_STEP: i32 = 10;

/// Awards are multiples of 10 between 10 and 100 inclusive.
pub fn validate_points(points: i32) -> Result<()> {
    if points % POINTS_STEP == 0 && (POINTS_STEP..=MAX_POINTS_PER_AWARDER as i32).contains(&points)
    {
        Ok(())
    } else {
        Err(AppError::bad_request(
            "INVALID_POINTS",
            "Points must be a multiple of 10 between 10 and 100",
        ))
    }
}

pub fn remaining_budget(already_awarded: i64) -> i64 {
    (MAX_POINTS_PER_AWARDER - already_awarded).max(0)
}

pub fn check_budget(already_awarded: i64, points: i32) -> Result<()> {
    if already_awarded + i64::from(points) > MAX_POINTS_PER_AWARDER {
        return Err(AppError::bad_request(
            "POINTS_LIMIT_EXCEEDED",
            format!(
                "Award exceeds the 100 point limit per post; {} points remaining",
                remaining_budget(already_awarded)
            ),
        ));
    }
    Ok(())
}

fn outcome_label(result: &Result<AwardPointsResponse>) -> &'static str {
    match result {
        Ok(_) => "granted",
        Err(e) => match e.code() {
            "INVALID_POINTS" => "invalid_points",
            "POST_NOT_FOUND" => "not_found",
            "CANNOT_AWARD_OWN_POST" => "own_post",
            "POINTS_LIMIT_EXCEEDED" => "limit_exceeded",
            _ => "error",
        },
    }
}

pub struct KnowledgePointService {
    pool: PgPool,
}

impl KnowledgePointService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn award(
        &self,
        post_id: Uuid,
        awarder_id: Uuid,
        points: i32,
    ) -> Result<AwardPointsResponse> {
        let result = self.try_award(post_id, awarder_id, points).await;
        record_award(outcome_label(&result));
        result
    }

    async fn try_award(
        &self,
        post_id: Uuid,
        awarder_id: Uuid,
        points: i32,
    ) -> Result<AwardPointsResponse> {
        validate_points(points)?;

        let mut tx = self.pool.begin().await?;

        let post = post_repo::lock_post(&mut tx, post_id)
            .await?
            .ok_or_else(|| AppError::not_found("POST_NOT_FOUND", "Post not found"))?;

        if post.author_id == awarder_id {
            return Err(AppError::bad_request(
                "CANNOT_AWARD_OWN_POST",
                "You cannot award knowledge points to your own post",
            ));
        }

        let already = knowledge_repo::sum_awarded(&mut *tx, post_id, awarder_id).await?;
        check_budget(already, points)?;

        let award = knowledge_repo::insert_award(&mut tx, post_id, awarder_id, points).await?;
        let post_total = knowledge_repo::add_post_points(&mut tx, post_id, points).await?;

        notification_repo::create_notification(
            &mut *tx,
            &NewNotification {
                user_id: post.author_id,
                actor_id: Some(awarder_id),
                kind: NotificationKind::KnowledgePoints,
                post_id: Some(post_id),
                message: format!(
                    "{} awarded {} knowledge points to your post",
                    award.awarder_username, points
                ),
            },
        )
        .await?;

        tx.commit().await?;

        let awarded_by_you = already + i64::from(points);
        tracing::info!(
            %post_id,
            %awarder_id,
            points,
            post_total,
            awarded_by_you,
            "award granted"
        );

        Ok(AwardPointsResponse {
            award,
            post_total,
            awarded_by_you,
            remaining_budget: remaining_budget(awarded_by_you),
        })
    }

    pub async fn summary(
        &self,
        post_id: Uuid,
        viewer_id: Option<Uuid>,
    ) -> Result<KnowledgePointsSummary> {
        let total_points = knowledge_repo::post_total(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::not_found("POST_NOT_FOUND", "Post not found"))?;
        let awards = knowledge_repo::list_awards(&self.pool, post_id).await?;

        let awarded_by_you = match viewer_id {
            Some(viewer) => Some(knowledge_repo::sum_awarded(&self.pool, post_id, viewer).await?),
            None => None,
        };

        Ok(KnowledgePointsSummary {
            post_id,
            total_points,
            awards,
            awarded_by_you,
            remaining_budget: awarded_by_you.map(remaining_budget),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_multiples_of_ten_in_range() {
        for points in (10..=100).step_by(10) {
            assert!(validate_points(points).is_ok(), "{points} should be valid");
        }
    }

    #[test]
    fn rejects_everything_else() {
        for points in [-10, 0, 5, 15, 99, 101, 110, 1000] {
            let err = validate_points(points).unwrap_err();
            assert_eq!(err.code(), "INVALID_POINTS", "{points} should be rejected");
        }
    }

    #[test]
    fn budget_allows_exactly_one_hundred() {
        assert!(check_budget(0, 100).is_ok());
        assert!(check_budget(90, 10).is_ok());
        assert!(check_budget(50, 50).is_ok());
    }

    #[test]
    fn budget_rejects_overflow_and_reports_remaining() {
        let err = check_budget(70, 40).unwrap_err();
        assert_eq!(err.code(), "POINTS_LIMIT_EXCEEDED");
        assert!(err.to_string().contains("30 points remaining"));

        let err = check_budget(100, 10).unwrap_err();
        assert!(err.to_string().contains("0 points remaining"));
    }

    #[test]
    fn remaining_budget_never_negative() {
        assert_eq!(remaining_budget(0), 100);
        assert_eq!(remaining_budget(60), 40);
        assert_eq!(remaining_budget(100), 0);
        assert_eq!(remaining_budget(130), 0);
    }

    #[test]
    fn outcome_labels_follow_error_codes() {
        let limited: Result<AwardPointsResponse> =
            Err(AppError::bad_request("POINTS_LIMIT_EXCEEDED", "x"));
        assert_eq!(outcome_label(&limited), "limit_exceeded");

        let own: Result<AwardPointsResponse> =
            Err(AppError::bad_request("CANNOT_AWARD_OWN_POST", "x"));
        assert_eq!(outcome_label(&own), "own_post");

        let broken: Result<AwardPointsResponse> = Err(AppError::Internal("boom".into()));
        assert_eq!(outcome_label(&broken), "error");
    }
}

/// Course service - course catalog and enrollments
use crate::db::{course_repo, enrollment_repo};
use crate::error::{AppError, Result};
use crate::metrics::learning::record_enrollment;
use crate::models::{
    Course, CourseCapacity, CourseFilter, CreateCourseRequest, Enrollment, EnrollmentWithCourse,
    PageParams, Paginated, UpdateCourseRequest,
};
use actix_middleware::AuthUser;
use sqlx::PgPool;
use uuid::Uuid;

pub fn validate_progress(progress: i32) -> Result<()> {
    if (0..=100).contains(&progress) {
        Ok(())
    } else {
        Err(AppError::bad_request(
            "INVALID_PROGRESS",
            "Progress must be between 0 and 100",
        ))
    }
}

/// Checks run against the locked course row before inserting an enrollment.
pub fn check_enrollable(course: &CourseCapacity) -> Result<()> {
    if !course.is_published {
        return Err(AppError::bad_request(
            "COURSE_NOT_PUBLISHED",
            "Course is not open for enrollment",
        ));
    }
    if let Some(max) = course.max_students {
        if course.enrolled_count >= max {
            return Err(AppError::bad_request("COURSE_FULL", "Course is full"));
        }
    }
    Ok(())
}

fn course_not_found() -> AppError {
    AppError::not_found("COURSE_NOT_FOUND", "Course not found")
}

fn enrollment_outcome(result: &Result<Enrollment>) -> &'static str {
    match result {
        Ok(_) => "enrolled",
        Err(e) => match e.code() {
            "COURSE_NOT_FOUND" => "not_found",
            "COURSE_NOT_PUBLISHED" => "unpublished",
            "COURSE_FULL" => "full",
            "ALREADY_ENROLLED" => "duplicate",
            _ => "error",
        },
    }
}

pub struct CourseService {
    pool: PgPool,
}

impl CourseService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_course(
        &self,
        instructor_id: Uuid,
        req: &CreateCourseRequest,
    ) -> Result<Course> {
        let course = course_repo::create_course(&self.pool, instructor_id, req).await?;
        tracing::info!(course_id = %course.id, %instructor_id, "course created");
        Ok(course)
    }

    /// Drafts are only visible to their instructor and admins.
    pub async fn get_course(&self, course_id: Uuid, viewer: Option<&AuthUser>) -> Result<Course> {
        let course = course_repo::find_course(&self.pool, course_id)
            .await?
            .ok_or_else(course_not_found)?;

        let can_see_draft =
            viewer.is_some_and(|v| v.user_id == course.instructor_id || v.is_admin());
        if !course.is_published && !can_see_draft {
            return Err(course_not_found());
        }
        Ok(course)
    }

    pub async fn list_courses(
        &self,
        viewer_id: Option<Uuid>,
        filter: &CourseFilter,
    ) -> Result<Paginated<Course>> {
        let params = filter.pagination();
        let items = course_repo::list_courses(
            &self.pool,
            viewer_id,
            filter,
            params.limit(),
            params.offset(),
        )
        .await?;
        let total = course_repo::count_courses(&self.pool, viewer_id, filter).await?;
        Ok(Paginated::new(items, params, total))
    }

    pub async fn update_course(
        &self,
        user: &AuthUser,
        course_id: Uuid,
        req: &UpdateCourseRequest,
    ) -> Result<Course> {
        let course = course_repo::find_course(&self.pool, course_id)
            .await?
            .ok_or_else(course_not_found)?;
        user.require_owner_or_admin(course.instructor_id)?;

        course_repo::update_course(&self.pool, course_id, req)
            .await?
            .ok_or_else(course_not_found)
    }

    pub async fn delete_course(&self, user: &AuthUser, course_id: Uuid) -> Result<()> {
        let course = course_repo::find_course(&self.pool, course_id)
            .await?
            .ok_or_else(course_not_found)?;
        user.require_owner_or_admin(course.instructor_id)?;

        course_repo::delete_course(&self.pool, course_id).await?;
        tracing::info!(%course_id, deleted_by = %user.user_id, "course deleted");
        Ok(())
    }

    pub async fn enroll(&self, course_id: Uuid, user_id: Uuid) -> Result<Enrollment> {
        let result = self.try_enroll(course_id, user_id).await;
        record_enrollment(enrollment_outcome(&result));
        result
    }

    async fn try_enroll(&self, course_id: Uuid, user_id: Uuid) -> Result<Enrollment> {
        let mut tx = self.pool.begin().await?;

        let course = course_repo::lock_capacity(&mut tx, course_id)
            .await?
            .ok_or_else(course_not_found)?;
        check_enrollable(&course)?;

        let enrollment = enrollment_repo::insert_enrollment(&mut tx, course_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::bad_request("ALREADY_ENROLLED", "You are already enrolled in this course")
            })?;
        course_repo::adjust_enrolled_count(&mut tx, course_id, 1).await?;

        tx.commit().await?;

        tracing::info!(%course_id, %user_id, "enrollment created");
        Ok(enrollment)
    }

    pub async fn unenroll(&self, course_id: Uuid, user_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        course_repo::lock_capacity(&mut tx, course_id)
            .await?
            .ok_or_else(course_not_found)?;

        if !enrollment_repo::delete_enrollment(&mut tx, course_id, user_id).await? {
            return Err(AppError::not_found(
                "NOT_ENROLLED",
                "You are not enrolled in this course",
            ));
        }
        course_repo::adjust_enrolled_count(&mut tx, course_id, -1).await?;

        tx.commit().await?;

        tracing::info!(%course_id, %user_id, "enrollment removed");
        Ok(())
    }

    pub async fn update_progress(
        &self,
        course_id: Uuid,
        user_id: Uuid,
        progress: i32,
    ) -> Result<Enrollment> {
        validate_progress(progress)?;

        enrollment_repo::update_progress(&self.pool, course_id, user_id, progress)
            .await?
            .ok_or_else(|| {
                AppError::not_found("NOT_ENROLLED", "You are not enrolled in this course")
            })
    }

    pub async fn my_enrollments(
        &self,
        user_id: Uuid,
        params: PageParams,
    ) -> Result<Paginated<EnrollmentWithCourse>> {
        let items =
            enrollment_repo::list_for_user(&self.pool, user_id, params.limit(), params.offset())
                .await?;
        let total = enrollment_repo::count_for_user(&self.pool, user_id).await?;
        Ok(Paginated::new(items, params, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity(is_published: bool, max_students: Option<i32>, enrolled_count: i32) -> CourseCapacity {
        CourseCapacity {
            id: Uuid::new_v4(),
            is_published,
            max_students,
            enrolled_count,
        }
    }

    #[test]
    fn progress_bounds() {
        assert!(validate_progress(0).is_ok());
        assert!(validate_progress(100).is_ok());
        assert_eq!(validate_progress(-1).unwrap_err().code(), "INVALID_PROGRESS");
        assert_eq!(validate_progress(101).unwrap_err().code(), "INVALID_PROGRESS");
    }

    #[test]
    fn unpublished_courses_reject_enrollment() {
        let err = check_enrollable(&capacity(false, None, 0)).unwrap_err();
        assert_eq!(err.code(), "COURSE_NOT_PUBLISHED");
    }

    #[test]
    fn full_courses_reject_enrollment() {
        let err = check_enrollable(&capacity(true, Some(30), 30)).unwrap_err();
        assert_eq!(err.code(), "COURSE_FULL");
        assert!(check_enrollable(&capacity(true, Some(30), 29)).is_ok());
    }

    #[test]
    fn uncapped_courses_always_have_room() {
        assert!(check_enrollable(&capacity(true, None, 10_000)).is_ok());
    }

    #[test]
    fn duplicate_enrollment_is_labelled() {
        let dup: Result<Enrollment> = Err(AppError::bad_request("ALREADY_ENROLLED", "x"));
        assert_eq!(enrollment_outcome(&dup), "duplicate");
    }
}

use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    /// Knowledge-point award attempts by outcome (granted, invalid_points, own_post, limit_exceeded, not_found, error).
    pub static ref KNOWLEDGE_POINT_AWARDS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "knowledge_point_awards_total",
        "Knowledge point award attempts segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register knowledge_point_awards_total");

    /// Enrollment attempts by outcome (enrolled, full, duplicate, unpublished, not_found, error).
    pub static ref ENROLLMENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "course_enrollments_total",
        "Course enrollment attempts segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register course_enrollments_total");
}

pub fn record_award(outcome: &str) {
    KNOWLEDGE_POINT_AWARDS_TOTAL
        .with_label_values(&[outcome])
        .inc();
}

pub fn record_enrollment(outcome: &str) {
    ENROLLMENTS_TOTAL.with_label_values(&[outcome]).inc();
}

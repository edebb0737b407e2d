//! Custom field validators for request bodies.
use validator::ValidationError;

/// Rejects strings that are empty once surrounding whitespace is trimmed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Usernames are stored as given, so letters, digits, `_`, `.` and `-` only.
pub fn username_shape(value: &str) -> Result<(), ValidationError> {
    let valid = value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if !valid {
        let mut err = ValidationError::new("invalid_username");
        err.message = Some("may only contain letters, digits, '_', '.' and '-'".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_is_blank() {
        assert!(not_blank("").is_err());
        assert!(not_blank("   \t\n").is_err());
        assert!(not_blank(" a ").is_ok());
    }

    #[test]
    fn usernames_cannot_carry_spaces() {
        assert!(username_shape("ada_lovelace").is_ok());
        assert!(username_shape("grace.h-1").is_ok());
        assert!(username_shape(" ab ").is_err());
        assert!(username_shape("two words").is_err());
    }
}

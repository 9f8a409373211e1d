/// Input validation utilities for form fields
use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidateEmail;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{2,31}$").expect("valid username regex"));

/// Validates email format
pub fn validate_email(email: &str) -> bool {
    email.validate_email()
}

/// Validates username format
/// Requirements:
/// - Length between 3 and 32 characters
/// - Only alphanumeric, underscore, and hyphen allowed
/// - Must start with an alphanumeric character
pub fn validate_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

/// Validates a free-text bio (at most 140 characters)
pub fn validate_about_me(about_me: &str) -> bool {
    about_me.chars().count() <= 140
}

/// Validates a tag title (1 to 30 characters after trimming)
pub fn validate_tag_title(title: &str) -> bool {
    let len = title.trim().chars().count();
    (1..=30).contains(&len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("user+tag@example.co.uk"));
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(!validate_email("invalid-email"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("user@"));
    }

    #[test]
    fn test_validate_username_valid() {
        assert!(validate_username("user123"));
        assert!(validate_username("user-name"));
        assert!(validate_username("user_name"));
    }

    #[test]
    fn test_validate_username_too_short() {
        assert!(!validate_username("ab"));
    }

    #[test]
    fn test_validate_username_too_long() {
        assert!(!validate_username(&"a".repeat(33)));
    }

    #[test]
    fn test_validate_username_starts_with_special() {
        assert!(!validate_username("_username"));
        assert!(!validate_username("-username"));
    }

    #[test]
    fn test_validate_username_invalid_characters() {
        assert!(!validate_username("user@name"));
        assert!(!validate_username("user.name"));
        assert!(!validate_username("user name"));
    }

    #[test]
    fn test_validate_about_me_limit() {
        assert!(validate_about_me(""));
        assert!(validate_about_me(&"x".repeat(140)));
        assert!(!validate_about_me(&"x".repeat(141)));
    }

    #[test]
    fn test_validate_tag_title() {
        assert!(validate_tag_title("general"));
        assert!(!validate_tag_title("   "));
        assert!(!validate_tag_title(&"t".repeat(31)));
    }
}

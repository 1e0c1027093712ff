//! Login identity classification.
//!
//! A caller may log in with either their user name or their email
//! address; a syntactic email check picks the lookup path.

use validator::ValidateEmail;

/// How a caller identified themselves at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginIdentity<'a> {
    Name(&'a str),
    Email(&'a str),
}

/// Classify a raw identity string, or `None` when it is unusable.
pub fn classify_identity(identity: &str) -> Option<LoginIdentity<'_>> {
    let identity = identity.trim();
    if identity.is_empty() {
        return None;
    }

    if identity.validate_email() {
        Some(LoginIdentity::Email(identity))
    } else {
        Some(LoginIdentity::Name(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_classified_as_email() {
        assert_eq!(
            classify_identity("alice@example.com"),
            Some(LoginIdentity::Email("alice@example.com"))
        );
    }

    #[test]
    fn test_plain_name_is_classified_as_name() {
        assert_eq!(
            classify_identity("alice"),
            Some(LoginIdentity::Name("alice"))
        );
    }

    #[test]
    fn test_almost_email_falls_back_to_name() {
        // Not syntactically valid as an email; treated as a user name.
        assert_eq!(
            classify_identity("alice@"),
            Some(LoginIdentity::Name("alice@"))
        );
    }

    #[test]
    fn test_blank_identity_is_rejected() {
        assert_eq!(classify_identity(""), None);
        assert_eq!(classify_identity("   "), None);
    }
}

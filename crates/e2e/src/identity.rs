//! Per-run test identity

use uuid::Uuid;

/// Fixed password for generated identities. The target's password
/// policy requires a mixed-case alphanumeric with punctuation.
pub const TEST_PASSWORD: &str = "Abc123!";

/// The synthetic credential pair registered and consumed by the suite.
///
/// Generated once per run and immutable afterwards; every scenario that
/// needs an account sees the same identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestIdentity {
    pub username: String,
    pub password: String,
}

impl TestIdentity {
    /// Generate a fresh identity. The username embeds a random token so
    /// repeated runs against a shared environment never collide. The
    /// target offers no account deletion, so per-run uniqueness is the
    /// only collision strategy available.
    pub fn generate() -> Self {
        let token = Uuid::new_v4().simple().to_string();
        Self {
            username: format!("user{}", &token[..8]),
            password: TEST_PASSWORD.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_has_expected_shape() {
        let identity = TestIdentity::generate();
        assert!(identity.username.starts_with("user"));
        assert_eq!(identity.username.len(), "user".len() + 8);
        assert!(identity.username["user".len()..]
            .chars()
            .all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn usernames_are_unique_across_generations() {
        let a = TestIdentity::generate();
        let b = TestIdentity::generate();
        assert_ne!(a.username, b.username);
    }

    #[test]
    fn password_is_the_fixed_constant() {
        assert_eq!(TestIdentity::generate().password, TEST_PASSWORD);
    }
}

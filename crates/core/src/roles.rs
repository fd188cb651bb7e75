//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role` in
//! `20260301000001_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_VIEWER: &str = "viewer";

/// Whether the role may create, edit, publish or delete records.
pub fn can_mutate(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_EDITOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_and_editor_mutate() {
        assert!(can_mutate(ROLE_ADMIN));
        assert!(can_mutate(ROLE_EDITOR));
    }

    #[test]
    fn viewer_and_unknown_are_read_only() {
        assert!(!can_mutate(ROLE_VIEWER));
        assert!(!can_mutate("guest"));
    }
}

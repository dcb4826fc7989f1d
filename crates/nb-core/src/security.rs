use crate::domain::UserId;

// ============== Authorization ==============

/// An empty allow-list leaves the bot open to everyone.
pub fn is_authorized(user_id: Option<UserId>, allowed_users: &[i64]) -> bool {
    let Some(user_id) = user_id else {
        return false;
    };
    allowed_users.is_empty() || allowed_users.contains(&user_id.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_bot_allows_any_known_user() {
        assert!(is_authorized(Some(UserId(42)), &[]));
        assert!(!is_authorized(None, &[]));
    }

    #[test]
    fn allow_list_is_enforced() {
        assert!(is_authorized(Some(UserId(1)), &[1, 2]));
        assert!(!is_authorized(Some(UserId(3)), &[1, 2]));
        assert!(!is_authorized(None, &[1]));
    }
}

use serde::{Deserialize, Serialize};

/// Role attached to a session; admins may change tasks, everyone may view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
        }
    }
}

/// The signed-in user as stored in the session file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: Role,
}

/// Session context passed to anything that needs to know who is acting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

impl AuthState {
    pub fn logged_out() -> Self {
        AuthState {
            user: None,
            is_authenticated: false,
        }
    }

    pub fn signed_in(user: User) -> Self {
        AuthState {
            user: Some(user),
            is_authenticated: true,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }

    #[test]
    fn user_round_trips_through_json() {
        let user = User {
            id: "1".to_string(),
            username: "casey".to_string(),
            role: Role::User,
        };
        let json = serde_json::to_string(&user).unwrap();
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn logged_out_state_has_no_user() {
        let state = AuthState::logged_out();
        assert!(!state.is_authenticated);
        assert_eq!(state.username(), None);
    }
}

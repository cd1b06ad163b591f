use crate::io::local::{self, LocalError};
use crate::io::paths::DataPaths;
use crate::model::{AuthState, Role, User};

/// The one username that signs in with the admin role
pub const ADMIN_USERNAME: &str = "otabek";

/// Longest accepted username
pub const MAX_USERNAME_LEN: usize = 25;

/// Why a login attempt was rejected
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("please enter a username")]
    EmptyUsername,
    #[error("username must be {MAX_USERNAME_LEN} characters or fewer")]
    TooLong,
    #[error(transparent)]
    Store(#[from] LocalError),
}

/// Sign in. Any non-empty username is accepted; the admin username gets
/// the admin role, everyone else is a regular user. The session persists
/// until logout.
pub fn login(paths: &DataPaths, username: &str) -> Result<AuthState, LoginError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(LoginError::EmptyUsername);
    }
    if trimmed.chars().count() > MAX_USERNAME_LEN {
        return Err(LoginError::TooLong);
    }
    let role = if trimmed.to_lowercase() == ADMIN_USERNAME {
        Role::Admin
    } else {
        Role::User
    };
    let user = User {
        id: "1".to_string(),
        username: trimmed.to_string(),
        role,
    };
    local::write_session(paths, &user)?;
    Ok(AuthState::signed_in(user))
}

/// Sign out and clear the persisted session
pub fn logout(paths: &DataPaths) -> Result<AuthState, LocalError> {
    local::clear_session(paths)?;
    Ok(AuthState::logged_out())
}

/// The current session, read from disk. Missing or corrupt session data
/// means signed out, never an error.
pub fn auth_state(paths: &DataPaths) -> AuthState {
    match local::read_session(paths) {
        Some(user) => AuthState::signed_in(user),
        None => AuthState::logged_out(),
    }
}

/// The single capability check for anything that changes tasks. Viewing
/// needs only a session; add, edit, move and delete need this.
pub fn can_manage_tasks(auth: &AuthState) -> bool {
    auth.is_authenticated
        && auth
            .user
            .as_ref()
            .is_some_and(|u| u.role == Role::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn temp_paths() -> (TempDir, DataPaths) {
        let dir = TempDir::new().unwrap();
        let paths = DataPaths::at(dir.path());
        (dir, paths)
    }

    #[test]
    fn admin_username_gets_admin_role() {
        let (_dir, paths) = temp_paths();
        let auth = login(&paths, "otabek").unwrap();
        assert!(auth.is_authenticated);
        assert_eq!(auth.user.as_ref().unwrap().role, Role::Admin);
        assert!(can_manage_tasks(&auth));
    }

    #[test]
    fn admin_check_ignores_case_and_padding() {
        let (_dir, paths) = temp_paths();
        let auth = login(&paths, "  OtAbEk  ").unwrap();
        assert_eq!(auth.user.as_ref().unwrap().username, "OtAbEk");
        assert!(can_manage_tasks(&auth));
    }

    #[test]
    fn other_usernames_are_regular_users() {
        let (_dir, paths) = temp_paths();
        let auth = login(&paths, "casey").unwrap();
        assert!(auth.is_authenticated);
        assert_eq!(auth.user.as_ref().unwrap().role, Role::User);
        assert!(!can_manage_tasks(&auth));
    }

    #[test]
    fn empty_and_oversized_usernames_are_rejected() {
        let (_dir, paths) = temp_paths();
        assert!(matches!(
            login(&paths, "   "),
            Err(LoginError::EmptyUsername)
        ));
        assert!(matches!(
            login(&paths, &"x".repeat(26)),
            Err(LoginError::TooLong)
        ));
        assert!(login(&paths, &"x".repeat(25)).is_ok());
    }

    #[test]
    fn session_survives_a_restart() {
        let (_dir, paths) = temp_paths();
        login(&paths, "otabek").unwrap();

        let auth = auth_state(&paths);
        assert!(auth.is_authenticated);
        assert_eq!(auth.username(), Some("otabek"));
    }

    #[test]
    fn logout_clears_state_and_disk() {
        let (_dir, paths) = temp_paths();
        login(&paths, "casey").unwrap();

        let auth = logout(&paths).unwrap();
        assert!(!auth.is_authenticated);
        assert_eq!(auth.user, None);
        assert!(!auth_state(&paths).is_authenticated);
    }

    #[test]
    fn fresh_directory_is_signed_out() {
        let (_dir, paths) = temp_paths();
        let auth = auth_state(&paths);
        assert!(!auth.is_authenticated);
        assert!(!can_manage_tasks(&auth));
    }
}

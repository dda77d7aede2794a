//! Session Context
//!
//! Who is calling. Every service call that depends on the caller takes a
//! [`Session`] argument instead of reading ambient state.

use thiserror::Error;

use crate::uuids::TypedUuid;

/// Signed-in user marker.
#[derive(Debug)]
pub struct User;

/// User UUID
pub type UserUuid = TypedUuid<User>;

/// Caller role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    /// Not signed in.
    #[default]
    Guest,

    /// Signed-in customer.
    Customer,

    /// Signed-in administrator.
    Admin,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("sign in required")]
    SignInRequired,

    #[error("administrator access required")]
    AdminRequired,
}

/// Identity of the caller for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    user: Option<UserUuid>,
    role: Role,
}

impl Session {
    /// Anonymous visitor.
    #[must_use]
    pub fn guest() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn customer(user: UserUuid) -> Self {
        Self {
            user: Some(user),
            role: Role::Customer,
        }
    }

    #[must_use]
    pub fn admin(user: UserUuid) -> Self {
        Self {
            user: Some(user),
            role: Role::Admin,
        }
    }

    pub fn user(&self) -> Option<UserUuid> {
        self.user
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::SignInRequired`] for guests.
    pub fn require_user(&self) -> Result<UserUuid, AccessError> {
        self.user.ok_or(AccessError::SignInRequired)
    }

    /// The signed-in administrator.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::SignInRequired`] for guests and
    /// [`AccessError::AdminRequired`] for customers.
    pub fn require_admin(&self) -> Result<UserUuid, AccessError> {
        let user = self.require_user()?;

        if self.role != Role::Admin {
            return Err(AccessError::AdminRequired);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_cannot_act_as_user() {
        assert_eq!(Session::guest().require_user(), Err(AccessError::SignInRequired));
    }

    #[test]
    fn customer_is_not_admin() {
        let session = Session::customer(UserUuid::new());

        assert!(session.require_user().is_ok());
        assert_eq!(session.require_admin(), Err(AccessError::AdminRequired));
    }

    #[test]
    fn admin_passes_both_checks() {
        let user = UserUuid::new();
        let session = Session::admin(user);

        assert_eq!(session.require_user(), Ok(user));
        assert_eq!(session.require_admin(), Ok(user));
    }
}

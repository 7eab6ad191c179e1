//! Session identity.

use mockall::automock;

use crate::domain::users::models::{Role, UserUuid};

/// The identity attached to the current session, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Known { user: UserUuid, role: Role },
    Anonymous,
}

impl Identity {
    /// The signed-in user, when there is one.
    pub fn user(&self) -> Option<UserUuid> {
        match self {
            Self::Known { user, .. } => Some(*user),
            Self::Anonymous => None,
        }
    }
}

/// Read-only view of the session's identity, provided by whatever
/// authentication layer fronts the application.
#[automock]
pub trait IdentitySession: Send + Sync {
    fn current_user(&self) -> Identity;
}

/// An identity session fixed at construction time. Used by the CLI and by
/// request contexts where authentication has already been resolved.
#[derive(Debug, Clone)]
pub struct StaticIdentitySession {
    identity: Identity,
}

impl StaticIdentitySession {
    #[must_use]
    pub fn known(user: UserUuid, role: Role) -> Self {
        Self {
            identity: Identity::Known { user, role },
        }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            identity: Identity::Anonymous,
        }
    }
}

impl IdentitySession for StaticIdentitySession {
    fn current_user(&self) -> Identity {
        self.identity
    }
}

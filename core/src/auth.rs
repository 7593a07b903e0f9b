//! Identity and privilege: injected, never read from ambient state.

use crate::types::UserId;
use std::collections::BTreeSet;

/// Who is asking, and whether they may act on runs they did not create.
pub trait IdentityProvider {
    fn current_identity(&self) -> UserId;
    fn is_privileged(&self, user: &str) -> bool;
}

/// A fixed caller with a fixed admin list. Used by the CLI and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user:   UserId,
    admins: BTreeSet<UserId>,
}

impl StaticIdentity {
    pub fn new<I, S>(user: impl Into<UserId>, admins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<UserId>,
    {
        Self {
            user:   user.into(),
            admins: admins.into_iter().map(Into::into).collect(),
        }
    }

    /// Same admin list, different caller.
    pub fn as_user(&self, user: impl Into<UserId>) -> Self {
        Self {
            user:   user.into(),
            admins: self.admins.clone(),
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_identity(&self) -> UserId {
        self.user.clone()
    }

    fn is_privileged(&self, user: &str) -> bool {
        self.admins.contains(user)
    }
}

/// Creator-or-privileged rule for destructive run actions.
pub fn may_delete(identity: &dyn IdentityProvider, creator: &str) -> bool {
    let user = identity.current_identity();
    user == creator || identity.is_privileged(&user)
}

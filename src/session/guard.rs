use crate::models::{Role, Session};
use crate::routes::Route;

use super::SessionStore;

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// The route is public; no session needed.
    Open,
    /// A session with the required role is stored.
    Granted(Session),
    /// Go to this path (the required role's login page) instead.
    Redirect(String),
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Self::Redirect(_))
    }
}

/// Gate for protected views.
///
/// Purely a presence and equality check on the stored pair: no network
/// call, no expiry, no signature verification.
pub struct SessionGuard<'a> {
    store: &'a dyn SessionStore,
}

impl<'a> SessionGuard<'a> {
    pub fn new(store: &'a dyn SessionStore) -> Self {
        Self { store }
    }

    /// Grant access iff a non-empty token is stored together with `required`.
    pub fn check(&self, required: Role) -> Access {
        match self.store.get() {
            Some(session) if !session.token.is_empty() && session.user_type == required.as_str() => {
                Access::Granted(session)
            }
            Some(session) => {
                tracing::warn!(
                    "Session for '{}' cannot open a {} view",
                    session.user_type,
                    required
                );
                Access::Redirect(required.login_path())
            }
            None => {
                tracing::debug!("No session stored, redirecting to {} login", required);
                Access::Redirect(required.login_path())
            }
        }
    }

    pub fn check_route(&self, route: Route) -> Access {
        match route.required_role() {
            Some(role) => self.check(role),
            None => Access::Open,
        }
    }
}

use crate::storage::{load_flag, save_flag, ADMIN_MODE_KEY};
use leptos::prelude::*;

/// Admin-mode flags. Editing affordances show only while both are set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SessionFlags {
    pub authenticated: bool,
    pub admin_mode: bool,
}

impl SessionFlags {
    pub fn restored(authenticated: bool, admin_mode: bool) -> Self {
        Self {
            authenticated,
            admin_mode: authenticated && admin_mode,
        }
    }

    pub fn login(self) -> Self {
        Self {
            authenticated: true,
            admin_mode: true,
        }
    }

    /// Logout and route-guard failure both end here.
    pub fn logout(self) -> Self {
        Self::default()
    }

    /// Admin mode needs an authenticated session.
    pub fn with_admin_mode(self, on: bool) -> Self {
        Self {
            admin_mode: self.authenticated && on,
            ..self
        }
    }

    pub fn can_edit(self) -> bool {
        self.authenticated && self.admin_mode
    }
}

/// Session context shared through the component tree.
#[derive(Clone, Copy)]
pub(crate) struct AdminSession {
    flags: RwSignal<SessionFlags>,
}

impl AdminSession {
    pub fn restore(authenticated: bool) -> Self {
        Self {
            flags: RwSignal::new(SessionFlags::restored(authenticated, load_flag(ADMIN_MODE_KEY))),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.flags.get().authenticated
    }

    pub fn admin_mode(&self) -> bool {
        self.flags.get().can_edit()
    }

    pub fn admin_mode_untracked(&self) -> bool {
        self.flags.get_untracked().can_edit()
    }

    fn apply(&self, f: impl FnOnce(SessionFlags) -> SessionFlags) {
        let next = f(self.flags.get_untracked());
        save_flag(ADMIN_MODE_KEY, next.admin_mode);
        self.flags.set(next);
    }

    pub fn login(&self) {
        self.apply(SessionFlags::login);
        tracing::info!("admin session started");
    }

    pub fn logout(&self) {
        self.apply(SessionFlags::logout);
        tracing::info!("admin session ended");
    }

    pub fn set_admin_mode(&self, on: bool) {
        self.apply(|f| f.with_admin_mode(on));
    }

    pub fn toggle_admin_mode(&self) {
        let on = !self.admin_mode_untracked();
        self.set_admin_mode(on);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_enables_admin_mode() {
        let f = SessionFlags::default().login();
        assert!(f.authenticated);
        assert!(f.can_edit());
    }

    #[test]
    fn test_logout_clears_both() {
        let f = SessionFlags::default().login().logout();
        assert_eq!(f, SessionFlags::default());
    }

    #[test]
    fn test_admin_mode_requires_auth() {
        let anon = SessionFlags::default().with_admin_mode(true);
        assert!(!anon.admin_mode);

        let authed = SessionFlags::default().login().with_admin_mode(false);
        assert!(authed.authenticated);
        assert!(!authed.can_edit());
    }

    #[test]
    fn test_restored_flag_ignored_without_token() {
        assert!(!SessionFlags::restored(false, true).admin_mode);
        assert!(SessionFlags::restored(true, true).can_edit());
    }
}

//! Auth state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route guards and user-aware components read this store; only the auth flow
//! writes it. It never touches the network or storage.
//!
//! DESIGN
//! ======
//! `AuthStore` is a cloneable handle to one shared container with an explicit
//! observer list. Observers run synchronously, in registration order, after
//! every change and once immediately on subscribe. Notification happens with
//! no borrow held, so an observer may call back into the store.
//!
//! `reset` is deliberately two steps: it restores the initial loading shape,
//! notifies, then clears `loading` and notifies again. Observers therefore see
//! a brief `loading: true` on logout before settling.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::net::types::UserIdentity;

/// Identity plus authorization flag as shown to the UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionUser {
    pub identity: UserIdentity,
    pub is_admin: bool,
}

/// Authentication status mirrored for UI binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub authenticated: bool,
    pub loading: bool,
    pub user: Option<SessionUser>,
    pub access_token: Option<String>,
    pub error: Option<String>,
}

impl AuthState {
    /// Start-of-process shape: loading, nobody signed in.
    pub fn initial() -> Self {
        Self { authenticated: false, loading: true, user: None, access_token: None, error: None }
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::initial()
    }
}

type Observer = Rc<dyn Fn(&AuthState)>;

struct Inner {
    state: AuthState,
    observers: Vec<(u64, Observer)>,
    next_id: u64,
}

/// Observable auth state container.
#[derive(Clone)]
pub struct AuthStore {
    inner: Rc<RefCell<Inner>>,
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("AuthStore")
            .field("state", &inner.state)
            .field("observers", &inner.observers.len())
            .finish()
    }
}

impl AuthStore {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner { state: AuthState::initial(), observers: Vec::new(), next_id: 0 })),
        }
    }

    /// Register `observer`. It is called once now with the current state and
    /// again after every change until the returned handle is unsubscribed.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&AuthState) + 'static,
    {
        let observer: Observer = Rc::new(observer);
        let (id, current) = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.observers.push((id, Rc::clone(&observer)));
            (id, inner.state.clone())
        };
        observer(&current);
        Subscription { store: Rc::downgrade(&self.inner), id }
    }

    /// Signed in with `user` and `token`.
    pub fn set_authenticated(&self, user: SessionUser, token: impl Into<String>) {
        self.replace(AuthState {
            authenticated: true,
            loading: false,
            user: Some(user),
            access_token: Some(token.into()),
            error: None,
        });
    }

    /// Update only the loading flag.
    pub fn set_loading(&self, loading: bool) {
        self.update(|state| state.loading = loading);
    }

    /// Failed sign-in: clears identity and token, records `message`.
    pub fn set_error(&self, message: impl Into<String>) {
        self.replace(AuthState {
            authenticated: false,
            loading: false,
            user: None,
            access_token: None,
            error: Some(message.into()),
        });
    }

    /// Back to the initial shape, then `loading = false` (two notifications).
    pub fn reset(&self) {
        self.replace(AuthState::initial());
        self.set_loading(false);
    }

    pub fn snapshot(&self) -> AuthState {
        self.inner.borrow().state.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.borrow().state.authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.inner.borrow().state.loading
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.inner.borrow().state.user.clone()
    }

    /// Admin flag of the current user; `false` when nobody is signed in.
    pub fn is_admin(&self) -> bool {
        self.inner.borrow().state.is_admin()
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }

    fn replace(&self, next: AuthState) {
        self.update(|state| *state = next);
    }

    fn update(&self, mutate: impl FnOnce(&mut AuthState)) {
        let (state, observers) = {
            let mut inner = self.inner.borrow_mut();
            mutate(&mut inner.state);
            let observers: Vec<Observer> = inner.observers.iter().map(|(_, o)| Rc::clone(o)).collect();
            (inner.state.clone(), observers)
        };
        for observer in observers {
            observer(&state);
        }
    }
}

/// Handle returned by [`AuthStore::subscribe`].
///
/// Dropping the handle keeps the observer registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[must_use = "keep the handle to be able to unsubscribe"]
#[derive(Debug)]
pub struct Subscription {
    store: Weak<RefCell<Inner>>,
    id: u64,
}

impl Subscription {
    /// Remove the observer. No-op if the store is gone.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.store.upgrade() {
            inner.borrow_mut().observers.retain(|(id, _)| *id != self.id);
        }
    }
}

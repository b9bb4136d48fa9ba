//! Fakes for the browser seams, shared by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::config::AuthConfig;
use crate::net::http::{HttpBackend, HttpResponse, TransportError};
use crate::net::types::UserIdentity;
use crate::session::manager::SessionManager;
use crate::util::clock::Clock;
use crate::util::navigation::{CurrentLocation, Navigator};
use crate::util::storage::{KeyValueStore, MemoryStore, StorageError};

pub const ORIGIN: &str = "https://portal.example.edu";
pub const T0: i64 = 1_700_000_000_000;

// =============================================================================
// HTTP
// =============================================================================

/// One request seen by [`MockBackend`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub bearer: Option<String>,
    pub body: Option<serde_json::Value>,
}

/// Scripted backend: queued responses per path, every call recorded.
#[derive(Default)]
pub struct MockBackend {
    routes: RefCell<HashMap<String, VecDeque<Result<HttpResponse, TransportError>>>>,
    pub calls: RefCell<Vec<RecordedCall>>,
}

impl MockBackend {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn respond(&self, path: &str, status: u16, body: serde_json::Value) {
        self.push(path, Ok(HttpResponse::new(status, body.to_string())));
    }

    pub fn respond_raw(&self, path: &str, status: u16, body: &str) {
        self.push(path, Ok(HttpResponse::new(status, body)));
    }

    pub fn fail(&self, path: &str, message: &str) {
        self.push(path, Err(TransportError(message.to_owned())));
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.borrow().last().cloned()
    }

    fn push(&self, path: &str, result: Result<HttpResponse, TransportError>) {
        self.routes.borrow_mut().entry(path.to_owned()).or_default().push_back(result);
    }

    fn next(&self, path: &str) -> Result<HttpResponse, TransportError> {
        self.routes
            .borrow_mut()
            .get_mut(path)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(TransportError(format!("no scripted response for {path}"))))
    }
}

#[async_trait::async_trait(?Send)]
impl HttpBackend for MockBackend {
    async fn get(&self, path: &str, bearer: Option<&str>) -> Result<HttpResponse, TransportError> {
        self.calls.borrow_mut().push(RecordedCall {
            method: "GET",
            path: path.to_owned(),
            bearer: bearer.map(str::to_owned),
            body: None,
        });
        self.next(path)
    }

    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<HttpResponse, TransportError> {
        self.calls.borrow_mut().push(RecordedCall {
            method: "POST",
            path: path.to_owned(),
            bearer: None,
            body: Some(body.clone()),
        });
        self.next(path)
    }
}

// =============================================================================
// Browser window
// =============================================================================

/// Fake window: records navigations and applies URL rewrites to its own
/// path/query so tests can inspect the visible URL afterwards.
pub struct FakeWindow {
    origin: String,
    path: RefCell<String>,
    query: RefCell<String>,
    pub navigations: RefCell<Vec<String>>,
    pub rewrites: RefCell<Vec<String>>,
}

impl FakeWindow {
    pub fn at(path: &str, query: &str) -> Rc<Self> {
        Rc::new(Self {
            origin: ORIGIN.to_owned(),
            path: RefCell::new(path.to_owned()),
            query: RefCell::new(query.to_owned()),
            navigations: RefCell::new(Vec::new()),
            rewrites: RefCell::new(Vec::new()),
        })
    }

    pub fn visible_url(&self) -> String {
        format!("{}{}", self.path.borrow(), self.query.borrow())
    }

    pub fn last_navigation(&self) -> Option<String> {
        self.navigations.borrow().last().cloned()
    }
}

impl Navigator for FakeWindow {
    fn navigate(&self, url: &str) {
        self.navigations.borrow_mut().push(url.to_owned());
    }

    fn replace_url(&self, url: &str) {
        self.rewrites.borrow_mut().push(url.to_owned());
        let (path, query) = match url.find('?') {
            Some(idx) => (&url[..idx], &url[idx..]),
            None => (url, ""),
        };
        *self.path.borrow_mut() = path.to_owned();
        *self.query.borrow_mut() = query.to_owned();
    }
}

impl CurrentLocation for FakeWindow {
    fn origin(&self) -> String {
        self.origin.clone()
    }

    fn path(&self) -> String {
        self.path.borrow().clone()
    }

    fn query(&self) -> String {
        self.query.borrow().clone()
    }
}

// =============================================================================
// Storage
// =============================================================================

/// Storage that refuses writes to one key, as a full `localStorage` would.
/// Everything else goes through to `inner`.
pub struct RejectingStore {
    pub inner: Rc<MemoryStore>,
    rejected_key: String,
}

impl RejectingStore {
    pub fn new(inner: Rc<MemoryStore>, rejected_key: &str) -> Rc<Self> {
        Rc::new(Self { inner, rejected_key: rejected_key.to_owned() })
    }
}

impl KeyValueStore for RejectingStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key == self.rejected_key {
            return Err(StorageError::new(key, "QuotaExceededError"));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) {
        self.inner.remove(key);
    }
}

// =============================================================================
// Clock
// =============================================================================

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Cell<i64>,
}

impl ManualClock {
    pub fn at(now_ms: i64) -> Rc<Self> {
        Rc::new(Self { now: Cell::new(now_ms) })
    }

    pub fn advance(&self, ms: i64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn identity() -> UserIdentity {
    UserIdentity {
        id: "jdoe".to_owned(),
        email: "jdoe@example.edu".to_owned(),
        display_name: "Jane Doe".to_owned(),
        given_name: Some("Jane".to_owned()),
    }
}

pub fn exchange_success_body(expires_in: i64, is_admin: bool) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "accessToken": "access-123",
        "expiresIn": expires_in,
        "isAdmin": is_admin,
        "user": {"andrewId": "jdoe", "email": "jdoe@example.edu", "name": "Jane Doe", "givenName": "Jane"}
    })
}

/// Everything a manager test needs to poke at.
pub struct Harness {
    pub storage: Rc<MemoryStore>,
    pub http: Rc<MockBackend>,
    pub window: Rc<FakeWindow>,
    pub clock: Rc<ManualClock>,
    pub manager: SessionManager,
}

impl Harness {
    pub fn at(path: &str, query: &str) -> Self {
        let storage = Rc::new(MemoryStore::new());
        Self::build(path, query, storage.clone(), storage)
    }

    /// Like [`Harness::at`], but storage refuses writes to `rejected_key`.
    /// `storage` still exposes what actually got stored.
    pub fn rejecting_writes_to(path: &str, query: &str, rejected_key: &str) -> Self {
        let storage = Rc::new(MemoryStore::new());
        let backing = RejectingStore::new(storage.clone(), rejected_key);
        Self::build(path, query, storage, backing)
    }

    fn build(path: &str, query: &str, storage: Rc<MemoryStore>, backing: Rc<dyn KeyValueStore>) -> Self {
        let http = MockBackend::new();
        let window = FakeWindow::at(path, query);
        let clock = ManualClock::at(T0);
        let manager =
            SessionManager::new(AuthConfig::default(), backing, http.clone(), window.clone(), window.clone(), clock.clone());
        Self { storage, http, window, clock, manager }
    }

    pub fn new() -> Self {
        Self::at("/", "")
    }

    /// Persist a session expiring `ttl_ms` after the current clock time.
    pub fn seed_session(&self, ttl_ms: i64, is_admin: bool) {
        let keys = AuthConfig::default().storage_keys;
        self.storage.set(&keys.access_token, "access-123").unwrap();
        self.storage.set(&keys.user_info, &serde_json::to_string(&identity()).unwrap_or_default()).unwrap();
        self.storage.set(&keys.is_admin, if is_admin { "true" } else { "false" }).unwrap();
        self.storage.set(&keys.expires_at, &(self.clock.now_ms() + ttl_ms).to_string()).unwrap();
    }
}

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use feedback_api::AppStateInner;
use feedback_db::{Database, FeedbackStore, PageCursor};
use feedback_notify::{
    DispatchError, DispatchOutcome, Email, EmailError, EmailSender, NotificationDispatcher, Notifier,
};
use feedback_types::events::NotificationEvent;
use feedback_types::models::{FeedbackRecord, Form, NewFeedback};

pub const SERVICE_KEY: &str = "test-service-key";
pub const ANON_KEY: &str = "test-anon-key";
pub const FROM: &str = "Feedback <notifications@feedback.dev>";

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// In-memory DB with form `f1` registered at https://example.com.
pub fn seeded_db() -> Arc<Database> {
    let db = Database::open_in_memory().unwrap();
    db.create_form("f1", "https://example.com").unwrap();
    Arc::new(db)
}

/// Router whose detached dispatch goes to `notifier`, or to the in-process
/// dispatcher when `None`.
pub fn build_app(
    store: Arc<dyn FeedbackStore>,
    sender: Arc<dyn EmailSender>,
    notifier: Option<Arc<dyn Notifier>>,
) -> Router {
    let dispatcher = NotificationDispatcher::new(store.clone(), sender, FROM);
    let notifier: Arc<dyn Notifier> = match notifier {
        Some(notifier) => notifier,
        None => Arc::new(dispatcher.clone()),
    };

    feedback_api::router::build(Arc::new(AppStateInner {
        store,
        notifier,
        dispatcher,
        service_key: SERVICE_KEY.into(),
        anon_key: Some(ANON_KEY.into()),
    }))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn submit(app: Router, origin: Option<&str>, body: &str) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/feedback")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(origin) = origin {
        builder = builder.header(header::ORIGIN, origin);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn post_with_bearer(app: Router, uri: &str, bearer: Option<&str>, body: &str) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn get_with_bearer(app: Router, uri: &str, bearer: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Doubles
// ---------------------------------------------------------------------------

/// Records every email; fails for recipients listed in `fail_for`.
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<Email>>,
    pub fail_for: Vec<String>,
}

impl RecordingSender {
    pub fn failing_for(addresses: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_for: addresses.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn recipients(&self) -> Vec<String> {
        let mut to: Vec<String> = self.sent.lock().unwrap().iter().map(|e| e.to.clone()).collect();
        to.sort();
        to
    }
}

#[async_trait]
impl EmailSender for RecordingSender {
    async fn send(&self, email: &Email) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(email.clone());
        if self.fail_for.contains(&email.to) {
            return Err(EmailError::Rejected {
                status: 503,
                body: "provider unavailable".into(),
            });
        }
        Ok(())
    }
}

/// Forwards every event to a channel, then behaves according to `mode`.
pub struct ChannelNotifier {
    pub events: mpsc::UnboundedSender<NotificationEvent>,
    pub mode: NotifierMode,
}

pub enum NotifierMode {
    Succeed,
    Fail,
    /// Never completes
    Hang,
}

impl ChannelNotifier {
    pub fn new(mode: NotifierMode) -> (Arc<Self>, mpsc::UnboundedReceiver<NotificationEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { events, mode }), rx)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, event: NotificationEvent) -> Result<DispatchOutcome, DispatchError> {
        let _ = self.events.send(event);
        match self.mode {
            NotifierMode::Succeed => Ok(DispatchOutcome::Completed { sent: 1, failed: 0 }),
            NotifierMode::Fail => Err(DispatchError::Store(anyhow!("recipients table unavailable"))),
            NotifierMode::Hang => std::future::pending().await,
        }
    }
}

/// Wraps a real store, counting calls and optionally failing inserts.
pub struct InstrumentedStore {
    pub inner: Arc<Database>,
    pub calls: AtomicUsize,
    pub fail_inserts: bool,
}

impl InstrumentedStore {
    pub fn new(inner: Arc<Database>, fail_inserts: bool) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: AtomicUsize::new(0),
            fail_inserts,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FeedbackStore for InstrumentedStore {
    fn get_form_by_id(&self, id: &str) -> Result<Option<Form>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_form_by_id(id)
    }

    fn insert_feedback(&self, feedback: &NewFeedback) -> Result<FeedbackRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts {
            return Err(anyhow!("disk I/O error"));
        }
        FeedbackStore::insert_feedback(self.inner.as_ref(), feedback)
    }

    fn get_enabled_recipients(&self, form_id: &str) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_enabled_recipients(form_id)
    }

    fn list_feedback(
        &self,
        form_id: &str,
        limit: u32,
        before: Option<&PageCursor>,
    ) -> Result<Vec<FeedbackRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        FeedbackStore::list_feedback(self.inner.as_ref(), form_id, limit, before)
    }
}

//! Session store state machine
//!
//! [`ChatStore`] owns the collection of chat sessions, the active
//! conversation, and the request-lifecycle status. Every mutation is written
//! through to the injected [`KvStore`] immediately, except before the store
//! has hydrated from it (so startup never overwrites persisted state with
//! empty defaults).
//!
//! Submission is split into explicit phases so the store stays a plain,
//! inspectable state machine: [`ChatStore::begin_submit`] guards and records
//! the user turn, the caller performs the request, and
//! [`ChatStore::complete_submit`] records the outcome.
//! [`ChatStore::submit`] wraps the three steps plus the error cooldown.

use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::store::{ChatMessage, ChatSession};
use crate::inference::InferenceBackend;
use crate::lang::Language;
use crate::parser::parse_answer;
use crate::storage::KvStore;
use crate::Result;

/// Persisted keys; each holds an independent JSON document
const KEY_CHATS: &str = "chats";
const KEY_CURRENT_CHAT: &str = "current-chat";
const KEY_LANGUAGE: &str = "language";

/// How long the store stays in [`Status::Error`] before recovering on its own
pub const DEFAULT_ERROR_COOLDOWN: Duration = Duration::from_secs(2);

/// Request-lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Idle; submissions are accepted
    Ready,
    /// A submission was accepted, request not yet issued
    Submitted,
    /// The request is in flight
    Streaming,
    /// The last request failed; clears back to ready after the cooldown
    Error,
}

/// Token handed out by [`ChatStore::begin_submit`] and consumed by
/// [`ChatStore::complete_submit`]
#[derive(Debug)]
pub struct PendingQuery {
    /// The trimmed query text to send to the backend
    pub query: String,
    /// The session the response belongs to
    pub session_id: String,
}

/// Manages chat sessions, the active conversation, and persistence
pub struct ChatStore<S: KvStore> {
    storage: S,
    sessions: Vec<ChatSession>,
    current_id: Option<String>,
    messages: Vec<ChatMessage>,
    status: Status,
    language: Language,
    hydrated: bool,
    error_cooldown: Duration,
}

impl<S: KvStore> ChatStore<S> {
    /// Create a store over the given persistence backend.
    ///
    /// The store starts empty and un-hydrated; call [`ChatStore::hydrate`]
    /// before use, otherwise nothing is persisted.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            sessions: Vec::new(),
            current_id: None,
            messages: Vec::new(),
            status: Status::Ready,
            language: Language::default(),
            hydrated: false,
            error_cooldown: DEFAULT_ERROR_COOLDOWN,
        }
    }

    /// Override the error cooldown
    pub fn with_error_cooldown(mut self, cooldown: Duration) -> Self {
        self.error_cooldown = cooldown;
        self
    }

    /// Set the language used before a persisted preference is hydrated
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// All sessions, newest first
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// Id of the active session, if any
    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// Messages of the active conversation
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Current request-lifecycle status
    pub fn status(&self) -> Status {
        self.status
    }

    /// Current language preference
    pub fn language(&self) -> Language {
        self.language
    }

    /// Hand the persistence backend back (used by tests to inspect it)
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Load persisted state, falling back to defaults for absent or
    /// malformed keys, then enable write-through.
    ///
    /// A stored active-id that no longer matches a session is discarded.
    pub fn hydrate(&mut self) {
        self.sessions = self.load_json(KEY_CHATS, Vec::new());
        self.current_id = self.load_json(KEY_CURRENT_CHAT, None);
        self.language = self.load_json(KEY_LANGUAGE, self.language);

        if let Some(id) = self.current_id.clone() {
            match self.sessions.iter().find(|s| s.id == id) {
                Some(session) => self.messages = session.messages.clone(),
                None => {
                    debug!("stored active chat {} no longer exists", id);
                    self.current_id = None;
                }
            }
        }

        self.hydrated = true;
    }

    /// Start a fresh conversation.
    ///
    /// Clears the active pointer and in-progress messages; no session is
    /// created or persisted until a message is actually submitted.
    pub fn create_new_chat(&mut self) {
        self.current_id = None;
        self.messages.clear();
        self.persist_current();
    }

    /// Make an existing session the active one and load its messages.
    /// Unknown ids are ignored.
    pub fn select_chat(&mut self, id: &str) {
        let Some(session) = self.sessions.iter().find(|s| s.id == id) else {
            debug!("select_chat: unknown session {}", id);
            return;
        };
        self.messages = session.messages.clone();
        self.current_id = Some(id.to_string());
        self.persist_current();
    }

    /// Remove a session. Deleting the active session also clears the active
    /// pointer and in-progress messages; deleting an unknown id is a no-op.
    pub fn delete_chat(&mut self, id: &str) {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.sessions.len() == before {
            return;
        }
        self.persist_sessions();

        if self.current_id.as_deref() == Some(id) {
            self.current_id = None;
            self.messages.clear();
            self.persist_current();
        }
    }

    /// Change the language preference
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.persist_language();
    }

    /// Flip between Arabic and English
    pub fn toggle_language(&mut self) {
        self.set_language(self.language.toggled());
    }

    /// Accept a query for submission.
    ///
    /// Returns `None` without touching any state when the input is blank or
    /// a request is already in flight. On acceptance the user turn is
    /// recorded (creating and activating a session when none is active), the
    /// status moves to [`Status::Submitted`], and the returned token carries
    /// what the caller needs to issue the request.
    pub fn begin_submit(&mut self, input: &str) -> Option<PendingQuery> {
        let text = input.trim();
        if text.is_empty() || self.status != Status::Ready {
            return None;
        }

        let message = ChatMessage::user(text);
        let session_id = match self.current_id.clone() {
            Some(id) => {
                self.messages.push(message);
                self.sync_active_session();
                id
            }
            None => {
                let session = ChatSession::new(message);
                let id = session.id.clone();
                self.messages = session.messages.clone();
                self.sessions.insert(0, session);
                self.current_id = Some(id.clone());
                self.persist_current();
                id
            }
        };
        self.persist_sessions();
        self.status = Status::Submitted;

        Some(PendingQuery {
            query: text.to_string(),
            session_id,
        })
    }

    /// Mark the accepted submission as in flight
    pub fn mark_streaming(&mut self) {
        if self.status == Status::Submitted {
            self.status = Status::Streaming;
        }
    }

    /// Record the outcome of an accepted submission.
    ///
    /// On success the answer is parsed and appended as an assistant turn; on
    /// failure a fixed localized error message is appended instead and the
    /// status moves to [`Status::Error`]. If the target session was deleted
    /// while the request was in flight the response is dropped silently.
    pub fn complete_submit(&mut self, pending: PendingQuery, result: Result<String>) {
        let message = match result {
            Ok(answer) => {
                let parsed = parse_answer(&answer);
                self.status = Status::Ready;
                ChatMessage::assistant(parsed.clean_answer, parsed.sources)
            }
            Err(e) => {
                warn!("inference request failed: {}", e);
                self.status = Status::Error;
                ChatMessage::assistant(self.language.translation().error_message, Vec::new())
            }
        };

        let Some(session) = self
            .sessions
            .iter_mut()
            .find(|s| s.id == pending.session_id)
        else {
            debug!("dropping response for deleted session {}", pending.session_id);
            return;
        };
        session.append(message.clone());
        if self.current_id.as_deref() == Some(pending.session_id.as_str()) {
            self.messages.push(message);
        }
        self.persist_sessions();
    }

    /// Submit a query end to end: guard, send through `backend`, record the
    /// outcome, and on failure wait out the error cooldown before returning
    /// to [`Status::Ready`].
    ///
    /// Returns whether the submission was accepted.
    pub async fn submit<B>(&mut self, input: &str, backend: &B) -> bool
    where
        B: InferenceBackend + ?Sized,
    {
        let Some(pending) = self.begin_submit(input) else {
            return false;
        };
        self.mark_streaming();

        let result = backend.query(&pending.query).await;
        self.complete_submit(pending, result);

        if self.status == Status::Error {
            tokio::time::sleep(self.error_cooldown).await;
            self.status = Status::Ready;
        }
        true
    }

    /// Mirror the in-progress messages into the active session
    fn sync_active_session(&mut self) {
        let Some(id) = self.current_id.clone() else {
            return;
        };
        if let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) {
            session.messages = self.messages.clone();
            session.updated_at = Utc::now();
        }
    }

    fn load_json<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.storage.get(key) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    warn!("discarding malformed persisted value for {}: {}", key, e);
                    default
                }
            },
            None => default,
        }
    }

    fn persist_sessions(&mut self) {
        if !self.hydrated {
            return;
        }
        match serde_json::to_string(&self.sessions) {
            Ok(raw) => self.write(KEY_CHATS, raw),
            Err(e) => warn!("failed to serialize sessions: {}", e),
        }
    }

    fn persist_current(&mut self) {
        if !self.hydrated {
            return;
        }
        match serde_json::to_string(&self.current_id) {
            Ok(raw) => self.write(KEY_CURRENT_CHAT, raw),
            Err(e) => warn!("failed to serialize active chat id: {}", e),
        }
    }

    fn persist_language(&mut self) {
        if !self.hydrated {
            return;
        }
        match serde_json::to_string(&self.language) {
            Ok(raw) => self.write(KEY_LANGUAGE, raw),
            Err(e) => warn!("failed to serialize language: {}", e),
        }
    }

    // Writes are fire-and-forget; failures are logged, not propagated.
    fn write(&mut self, key: &str, raw: String) {
        if let Err(e) = self.storage.set(key, &raw) {
            warn!("failed to persist {}: {}", key, e);
        }
    }
}

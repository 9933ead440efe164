//! Form controller for the shortener screen.
//!
//! `ShortenerClient` owns the [`FormState`] and is the only thing that
//! mutates it. The terminal UI drives it through the split
//! `begin_*`/`complete_*` entry points so the event loop keeps running while
//! a request is in flight; `submit` and `lookup_short_url` are the awaited
//! forms of the same cycles.

use crate::api_client::{LookupResponse, ShortenApi, ShortenRequest, ShortenResponse};
use crate::clipboard::ClipboardSink;
use crate::errors::{ApiError, INVALID_URL_MESSAGE};
use crate::utils::copy_timer::ResetTimer;
use crate::validation::validate;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

/// Everything the form renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Raw input, exactly as typed
    pub url: String,
    pub loading: bool,
    pub short_url: String,
    pub error: String,
    pub copied: bool,
    /// Original URL reported by the lookup action
    pub resolved_url: String,
    pub lookup_error: String,
}

impl FormState {
    pub fn has_result(&self) -> bool {
        !self.short_url.is_empty()
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    fn clear_outcome(&mut self) {
        self.error.clear();
        self.short_url.clear();
        self.copied = false;
        self.resolved_url.clear();
        self.lookup_error.clear();
    }
}

/// What `begin_submit` decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStart {
    /// Input is valid and `loading` is now set; send this request
    Dispatch(ShortenRequest),
    /// Input failed validation; `error` is set and nothing is sent
    Invalid,
    /// A request is already in flight; nothing changed
    Busy,
}

/// Clears `loading` when dropped, whichever way the request ends.
struct LoadingReset<'a> {
    state: &'a mut FormState,
}

impl Drop for LoadingReset<'_> {
    fn drop(&mut self) {
        self.state.loading = false;
    }
}

pub struct ShortenerClient<A: ShortenApi, C: ClipboardSink> {
    api: Arc<A>,
    clipboard: C,
    state: FormState,
    copied_reset: ResetTimer,
    lookup_in_flight: bool,
}

impl<A: ShortenApi, C: ClipboardSink> ShortenerClient<A, C> {
    pub fn new(api: A, clipboard: C) -> Self {
        Self::with_shared_api(Arc::new(api), clipboard)
    }

    pub fn with_shared_api(api: Arc<A>, clipboard: C) -> Self {
        Self {
            api,
            clipboard,
            state: FormState::default(),
            copied_reset: ResetTimer::default(),
            lookup_in_flight: false,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Shared handle to the API, for dispatching requests off the UI task
    pub fn api(&self) -> Arc<A> {
        Arc::clone(&self.api)
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn is_lookup_in_flight(&self) -> bool {
        self.lookup_in_flight
    }

    pub fn on_url_change(&mut self, raw: &str) {
        self.state.url = raw.to_string();
    }

    /// Start a submission of the current input.
    ///
    /// Clears the previous outcome, validates, and on success enters the
    /// loading state. The caller must hand the request's result to
    /// [`ShortenerClient::complete_submit`].
    pub fn begin_submit(&mut self) -> SubmitStart {
        if self.state.loading || self.lookup_in_flight {
            debug!(target: "shortener", "Submit ignored, request already in flight");
            return SubmitStart::Busy;
        }

        self.state.clear_outcome();
        self.copied_reset.cancel();

        let trimmed = self.state.url.trim();
        if !validate(trimmed) {
            debug!(target: "shortener", "Rejected input: {:?}", trimmed);
            self.state.error = INVALID_URL_MESSAGE.to_string();
            return SubmitStart::Invalid;
        }

        let request = ShortenRequest {
            url: trimmed.to_string(),
        };
        self.state.loading = true;
        info!(target: "shortener", "Shortening {}", request.url);
        SubmitStart::Dispatch(request)
    }

    /// Finish a submission started by `begin_submit`
    pub fn complete_submit(&mut self, result: Result<ShortenResponse, ApiError>) {
        if !self.state.loading {
            warn!(target: "shortener", "Dropping response with no submission in flight");
            return;
        }
        let reset = LoadingReset {
            state: &mut self.state,
        };
        apply_shorten_result(&mut *reset.state, result);
    }

    /// Run a full submission cycle for the current input
    pub async fn submit(&mut self) {
        let request = match self.begin_submit() {
            SubmitStart::Dispatch(request) => request,
            SubmitStart::Invalid | SubmitStart::Busy => return,
        };

        // Held across the await so a dropped future still clears `loading`
        let reset = LoadingReset {
            state: &mut self.state,
        };
        let result = self.api.shorten(&request).await;
        apply_shorten_result(&mut *reset.state, result);
    }

    pub fn copy_to_clipboard(&mut self) {
        self.copy_to_clipboard_at(Instant::now());
    }

    /// Copy the short URL, arming the confirmation reset from `now`
    pub fn copy_to_clipboard_at(&mut self, now: Instant) {
        if self.state.short_url.is_empty() {
            return;
        }

        match self.clipboard.set_text(&self.state.short_url) {
            Ok(()) => {
                debug!(target: "shortener", "Copied {}", self.state.short_url);
                self.state.copied = true;
                self.copied_reset.arm(now);
            }
            Err(e) => {
                debug!(target: "shortener", "Clipboard write failed: {}", e);
            }
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Advance timers to `now`
    pub fn tick_at(&mut self, now: Instant) {
        if self.copied_reset.should_fire(now) {
            self.state.copied = false;
        }
    }

    /// Start resolving the current short URL back to its original.
    ///
    /// Returns the short id to look up, or None when there is nothing to
    /// look up or a request is already running.
    pub fn begin_lookup(&mut self) -> Option<String> {
        if self.state.loading || self.lookup_in_flight {
            return None;
        }
        let short_id = short_id_of(&self.state.short_url)?;

        self.state.resolved_url.clear();
        self.state.lookup_error.clear();
        self.lookup_in_flight = true;
        debug!(target: "shortener", "Looking up {}", short_id);
        Some(short_id)
    }

    pub fn complete_lookup(&mut self, result: Result<LookupResponse, ApiError>) {
        if !self.lookup_in_flight {
            return;
        }
        self.lookup_in_flight = false;

        match result {
            Ok(response) => self.state.resolved_url = response.original_url,
            Err(e) => {
                warn!(target: "shortener", "Lookup failed: {}", e);
                self.state.lookup_error = e.user_message();
            }
        }
    }

    pub async fn lookup_short_url(&mut self) {
        let Some(short_id) = self.begin_lookup() else {
            return;
        };
        let result = self.api.lookup(&short_id).await;
        self.complete_lookup(result);
    }
}

impl<A: ShortenApi, C: ClipboardSink> Drop for ShortenerClient<A, C> {
    fn drop(&mut self) {
        if self.copied_reset.is_pending() {
            debug!(target: "shortener", "Cancelling pending copy reset");
            self.copied_reset.cancel();
        }
    }
}

fn apply_shorten_result(state: &mut FormState, result: Result<ShortenResponse, ApiError>) {
    match result {
        Ok(response) => {
            info!(target: "shortener", "Short URL: {}", response.short_url);
            state.short_url = response.short_url;
        }
        Err(e) => {
            if e.is_rate_limited() {
                info!(target: "shortener", "Shorten rate limited: {}", e);
            } else {
                warn!(target: "shortener", "Shorten failed: {}", e);
            }
            state.error = e.user_message();
        }
    }
}

/// Last non-empty path segment of a short URL, ignoring query and fragment
pub fn short_id_of(short_url: &str) -> Option<String> {
    let url = Url::parse(short_url.trim()).ok()?;
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(|segment| segment.to_string())
}

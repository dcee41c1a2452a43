//! Asynchronous load bookkeeping.
//!
//! Each load is an explicit state machine (`Pending` → `Ready` | `Failed`)
//! carrying a [`CancelToken`]. Callbacks from a cancelled load are dropped,
//! so teardown never races a late completion.

use crate::error::{LoadError, ViewerError};
use std::cell::Cell;
use std::rc::Rc;
use url::Url;

/// Shared cancellation flag handed to every async boundary of a load.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// True when both tokens refer to the same load.
    pub fn same_load(&self, other: &CancelToken) -> bool {
        Rc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

#[derive(Debug)]
pub enum LoadState<T> {
    Pending { progress: f32 },
    Ready(T),
    Failed(LoadError),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Pending { progress: 0.0 }
    }
}

impl<T> LoadState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, LoadState::Pending { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }

    /// Last reported progress; 1.0 once ready.
    pub fn progress(&self) -> f32 {
        match self {
            LoadState::Pending { progress } => *progress,
            LoadState::Ready(_) => 1.0,
            LoadState::Failed(_) => 0.0,
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Ready(v) => Some(v),
            _ => None,
        }
    }

    /// Record progress; ignored once the load has settled. Values are
    /// stored as reported, without enforcing monotonicity.
    pub fn report_progress(&mut self, value: f32) -> bool {
        match self {
            LoadState::Pending { progress } if value.is_finite() => {
                *progress = value;
                true
            }
            _ => false,
        }
    }

    pub fn resolve(&mut self, value: T) -> bool {
        if self.is_pending() {
            *self = LoadState::Ready(value);
            true
        } else {
            false
        }
    }

    pub fn fail(&mut self, error: LoadError) -> bool {
        if self.is_pending() {
            *self = LoadState::Failed(error);
            true
        } else {
            false
        }
    }
}

/// Overlay text for a progress fraction: `0.3` → `"30%"`.
pub fn progress_label(progress: f32) -> String {
    let pct = if progress.is_finite() {
        (progress.clamp(0.0, 1.0) * 100.0).round()
    } else {
        0.0
    };
    format!("{}%", pct as u32)
}

/// Resolve a scene data URL against the page origin.
///
/// Absolute URLs pass through untouched; anything else is joined to the
/// origin with the usual relative-reference rules.
pub fn resolve_data_url(url: &str, origin: &str) -> Result<String, ViewerError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ViewerError::EmptyDataUrl);
    }
    if Url::parse(url).is_ok() {
        return Ok(url.to_string());
    }
    let invalid = || ViewerError::InvalidOrigin(origin.to_string());
    let base = Url::parse(origin.trim()).map_err(|_| invalid())?;
    if base.cannot_be_a_base() {
        return Err(invalid());
    }
    let joined = base.join(url).map_err(|_| invalid())?;
    Ok(joined.to_string())
}

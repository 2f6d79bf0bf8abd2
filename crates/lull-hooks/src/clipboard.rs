use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lull_core::{Signal, remember, signal};

use crate::error::ClipboardError;

/// Where clipboard text comes from. Installed per thread with
/// [`set_clipboard_backend`].
pub trait ClipboardBackend {
    fn get_text(&mut self) -> Result<String, ClipboardError>;
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The OS clipboard.
pub struct SystemClipboard(arboard::Clipboard);

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        arboard::Clipboard::new().map(Self).map_err(|e| {
            log::debug!("clipboard: system clipboard unavailable: {e}");
            ClipboardError::Unavailable
        })
    }
}

impl ClipboardBackend for SystemClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        self.0.get_text().map_err(|e| ClipboardError::Paste {
            reason: e.to_string(),
        })
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.0.set_text(text).map_err(|e| ClipboardError::Copy {
            reason: e.to_string(),
        })
    }
}

/// In-process clipboard for headless hosts and tests. Clones share contents.
#[derive(Clone, Default)]
pub struct MemoryClipboard {
    text: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let c = Self::default();
        *c.text.borrow_mut() = Some(text.into());
        c
    }

    pub fn contents(&self) -> Option<String> {
        self.text.borrow().clone()
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        self.text.borrow().clone().ok_or_else(|| ClipboardError::Paste {
            reason: "clipboard is empty".to_string(),
        })
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        *self.text.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

thread_local! {
    static BACKEND: RefCell<Option<Box<dyn ClipboardBackend>>> = const { RefCell::new(None) };
    static PROBED_SYSTEM: Cell<bool> = const { Cell::new(false) };
}

pub fn set_clipboard_backend(backend: Box<dyn ClipboardBackend>) {
    BACKEND.with(|b| *b.borrow_mut() = Some(backend));
}

/// Make every clipboard call fail with [`ClipboardError::Unavailable`]
/// without probing the OS clipboard.
pub fn disable_clipboard() {
    PROBED_SYSTEM.with(|p| p.set(true));
    BACKEND.with(|b| *b.borrow_mut() = None);
}

fn with_backend<R>(
    f: impl FnOnce(&mut dyn ClipboardBackend) -> Result<R, ClipboardError>,
) -> Result<R, ClipboardError> {
    BACKEND.with(|b| {
        let mut b = b.borrow_mut();
        if b.is_none() && !PROBED_SYSTEM.with(|p| p.replace(true)) {
            if let Ok(system) = SystemClipboard::new() {
                *b = Some(Box::new(system));
            }
        }
        match b.as_deref_mut() {
            Some(backend) => f(backend),
            None => Err(ClipboardError::Unavailable),
        }
    })
}

/// Outcome of the last clipboard operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClipboardState {
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct ClipboardHandle {
    state: Signal<ClipboardState>,
}

impl ClipboardHandle {
    /// Copy `text`. Blank text is rejected.
    pub fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let result = with_backend(|backend| {
            if text.trim().is_empty() {
                return Err(ClipboardError::EmptyText);
            }
            backend.set_text(text)
        });
        self.record(&result);
        result
    }

    /// Read the clipboard, trimmed.
    pub fn paste(&self) -> Result<String, ClipboardError> {
        let result = with_backend(|backend| backend.get_text()).map(|t| t.trim().to_string());
        self.record(&result);
        result
    }

    pub fn clear_state(&self) {
        self.state.set(ClipboardState::default());
    }

    pub fn state(&self) -> ClipboardState {
        self.state.get()
    }

    pub fn state_signal(&self) -> Signal<ClipboardState> {
        self.state.clone()
    }

    fn record<T>(&self, result: &Result<T, ClipboardError>) {
        let next = match result {
            Ok(_) => ClipboardState {
                success: true,
                error: None,
            },
            Err(e) => {
                log::debug!("clipboard: {e:?}");
                ClipboardState {
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        };
        self.state.set(next);
    }
}

/// Clipboard access with the outcome of the last call kept across frames.
pub fn use_clipboard() -> ClipboardHandle {
    let state = remember(|| signal(ClipboardState::default()));
    ClipboardHandle {
        state: (*state).clone(),
    }
}

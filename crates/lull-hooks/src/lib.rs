//! # Hooks
//!
//! Small, lifecycle-safe hooks on top of `lull-core`. Each one stores its state
//! in a `remember` slot and registers cleanup on the current scope, so
//! unmounting the host cancels whatever it had scheduled.
//!
//! - `use_debounce`: coalesce bursts of calls (leading/trailing edges, max-wait).
//! - `use_timeout`: single-shot timer with `reset` / `clear`.
//! - `use_media_query` / `use_breakpoints`: viewport conditions.
//! - `use_clipboard`: copy/paste with the last outcome as state.
//!
//! ```rust
//! use lull_core::*;
//! use lull_hooks::*;
//! use web_time::Duration;
//!
//! let clock = TestClock::new();
//! set_clock(Box::new(clock.clone()));
//!
//! let mut host = Host::with_viewport(Viewport::new(800, 600));
//! let saved = signal(0u32);
//!
//! let save = host.frame(|| {
//!     let saved = saved.clone();
//!     use_debounce(
//!         move |n: u32| saved.set(n),
//!         DebounceOptions::new(Duration::from_millis(300)),
//!     )
//! });
//!
//! for n in 1..=5 {
//!     save.trigger(n);
//! }
//! clock.advance(Duration::from_millis(300));
//! host.tick();
//! assert_eq!(saved.get(), 5);
//!
//! assert_eq!(host.frame(use_breakpoints).current(), "md");
//! ```

pub mod breakpoints;
pub mod clipboard;
pub mod debounce;
pub mod error;
pub mod media_query;
pub mod timeout;

pub use breakpoints::{Breakpoints, use_breakpoints};
pub use clipboard::{
    ClipboardBackend, ClipboardHandle, ClipboardState, MemoryClipboard, SystemClipboard,
    disable_clipboard, set_clipboard_backend, use_clipboard,
};
pub use debounce::{DebounceOptions, Debouncer, use_debounce};
pub use error::{ClipboardError, MediaQueryError};
pub use media_query::{Feature, MediaQuery, Orientation, use_media_query};
pub use timeout::{Timeout, use_timeout};

//! # Runtime, Timers, and Teardown
//!
//! Lull's core is a small single-threaded runtime that hooks build on. There
//! are four pieces:
//!
//! - `Host`: owns remembered slots, the root `Scope`, and the viewport.
//! - `remember*`: lifecycle‑aware storage bound to composition.
//! - timers: `set_timeout` / `TimerHandle`, fired by the host loop.
//! - `Scope` / `effect`: cleanup that runs when the host unmounts.
//!
//! ## Driving a host
//!
//! ```rust
//! use lull_core::*;
//! use web_time::Duration;
//!
//! let clock = TestClock::new();
//! set_clock(Box::new(clock.clone()));
//!
//! let mut host = Host::new();
//! let fired = signal(false);
//!
//! host.frame(|| {
//!     let fired = fired.clone();
//!     // Remembered across frames, so the timer is armed exactly once.
//!     let handle = remember(move || set_timeout(Duration::from_millis(50), move || fired.set(true)));
//!     let _ = handle;
//! });
//!
//! clock.advance(Duration::from_millis(50));
//! host.tick();
//! assert!(fired.get());
//! ```
//!
//! - `remember` and `remember_state` are order‑based: the Nth call in a
//!   composition always refers to the Nth stored value.
//! - `remember_with_key` and `remember_state_with_key` are key‑based and more
//!   stable across conditional branches.
//!
//! ## Timers
//!
//! Nothing runs inline. `set_timeout` records a deadline on the thread's timer
//! queue, and the host loop calls `Host::tick` (or `run_due_timers`) to fire
//! what is due, sleeping until `next_deadline` in between. Dropping a
//! `TimerHandle` cancels it.
//!
//! ## Effects and cleanup
//!
//! ```rust
//! use lull_core::*;
//!
//! let mut host = Host::new();
//! host.frame(|| {
//!     scoped_effect(|| {
//!         log::info!("mounted");
//!         Box::new(|| log::info!("unmounted"))
//!     });
//! });
//! host.unmount();
//! ```
//!
//! - `effect` runs once and returns a `Dispose` guard that also runs when the
//!   current scope is torn down.
//! - `disposable_effect` re-runs when its key changes, disposing the previous
//!   run first.

pub mod clock;
pub mod effects;
pub mod runtime;
pub mod scope;
pub mod signal;
pub mod tests;
pub mod timer;

pub use clock::*;
pub use effects::*;
pub use runtime::*;
pub use scope::*;
pub use signal::*;
pub use timer::*;

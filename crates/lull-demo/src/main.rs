//! Headless walkthrough: types a query into a debounced search, shows a toast
//! with a timeout, copies the final query, and reports breakpoints while the
//! "window" is resized.
//!
//! Run with `RUST_LOG=debug cargo run -p lull-demo`. Set `LULL_DEBOUNCE_MS` to
//! change the search delay.

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;

use anyhow::Context;
use lull_core::{Host, SystemClock, Viewport, next_deadline, now, set_clock};
use lull_hooks::*;
use web_time::{Duration, Instant};

const QUERY: &str = "rust debounce";
const KEYSTROKE: Duration = Duration::from_millis(40);
const TOAST: Duration = Duration::from_millis(400);

struct Ui {
    search: Debouncer<String>,
    toast: Timeout,
    clipboard: ClipboardHandle,
    breakpoints: Breakpoints,
}

fn debounce_delay() -> anyhow::Result<Duration> {
    match std::env::var("LULL_DEBOUNCE_MS") {
        Ok(raw) => {
            let ms: u64 = raw
                .parse()
                .with_context(|| format!("LULL_DEBOUNCE_MS={raw:?} is not a number of milliseconds"))?;
            Ok(Duration::from_millis(ms))
        }
        Err(_) => Ok(Duration::from_millis(150)),
    }
}

fn app(searches: Rc<RefCell<Vec<String>>>, delay: Duration) -> Ui {
    let search = use_debounce(
        move |q: String| {
            log::info!("search {q:?}");
            searches.borrow_mut().push(q);
        },
        DebounceOptions::new(delay).with_max_wait(delay * 4),
    );
    let toast = use_timeout(|| log::info!("toast dismissed"), Some(TOAST));

    Ui {
        search,
        toast,
        clipboard: use_clipboard(),
        breakpoints: use_breakpoints(),
    }
}

fn sleep_until(deadline: Instant) {
    let n = now();
    if deadline > n {
        thread::sleep(deadline - n);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    set_clock(Box::new(SystemClock));
    set_clipboard_backend(Box::new(MemoryClipboard::new()));

    let delay = debounce_delay()?;
    let searches = Rc::new(RefCell::new(Vec::new()));
    let mut host = Host::with_viewport(Viewport::new(1024, 768));

    let start = now();
    let mut typed = 0;
    let ui = loop {
        let ui = host.frame(|| app(searches.clone(), delay));

        if typed < QUERY.len() && now() >= start + KEYSTROKE * typed as u32 {
            typed += 1;
            ui.search.trigger(QUERY[..typed].to_string());
        }
        host.tick();

        if typed == QUERY.len() && !ui.search.is_pending() && !ui.toast.is_active() {
            break ui;
        }

        let next_key = (typed < QUERY.len()).then(|| start + KEYSTROKE * typed as u32);
        if let Some(wake) = [next_key, next_deadline()].into_iter().flatten().min() {
            sleep_until(wake);
        }
    };

    println!(
        "typed {} keystrokes, ran {} search(es): {:?}",
        QUERY.len(),
        searches.borrow().len(),
        searches.borrow()
    );

    if let Some(last) = searches.borrow().last() {
        ui.clipboard
            .copy(last)
            .context("copying the last query")?;
        let pasted = ui.clipboard.paste().context("reading the query back")?;
        println!("clipboard: {pasted:?} ({:?})", ui.clipboard.state());
    }

    println!("breakpoint at 1024px: {}", ui.breakpoints.current());
    for width in [360, 700, 1440, 1920] {
        host.resize(width, 900);
        let bp = host.frame(|| app(searches.clone(), delay).breakpoints);
        println!("breakpoint at {width}px: {} {bp:?}", bp.current());
    }

    host.unmount();
    log::debug!("frames composed: {}", host.frames());
    Ok(())
}

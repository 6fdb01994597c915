//! Composition root for the browser dashboard.

use std::rc::Rc;

use gloo::console;
use gloo_timers::callback::Interval;
use reach_monitor::{REFRESH_INTERVAL, StatusPoller};
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen_futures::spawn_local;

use crate::dom::{DomSink, DomTargets};
use crate::fetch::FetchStatusSource;

type BrowserPoller = StatusPoller<FetchStatusSource, DomSink>;

/// Start polling: one refresh right away, then one per interval for the
/// lifetime of the page.
///
/// Logs to the console and returns without polling when the page lacks any of
/// the target elements.
#[wasm_bindgen]
pub fn start() {
    console_error_panic_hook::set_once();

    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        console::error!("reach-ui: no document available");
        return;
    };
    let targets = match DomTargets::resolve(&document) {
        Ok(targets) => targets,
        Err(missing) => {
            console::error!("reach-ui: missing dashboard element", missing);
            return;
        }
    };

    let poller = Rc::new(StatusPoller::new(
        FetchStatusSource::same_origin(),
        DomSink::new(document, targets),
    ));
    spawn_cycle(&poller);

    let period_ms = u32::try_from(REFRESH_INTERVAL.as_millis()).unwrap_or(u32::MAX);
    // Cycles are not awaited here; overlapping ones resolve through the
    // poller's render gate.
    Interval::new(period_ms, move || spawn_cycle(&poller)).forget();
}

fn spawn_cycle(poller: &Rc<BrowserPoller>) {
    let poller = Rc::clone(poller);
    spawn_local(async move { poller.refresh().await });
}

//! Render sink over the elements of the dashboard page.

use gloo::console;
use reach_monitor::{Counters, LogLine, RefreshError, RenderSink};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::layout::{LogNode, SPAN_TAG, log_item_nodes};
use crate::targets::{
    DISQUALIFIED_COUNT, FOLLOWED_COUNT, LOG_ITEM_TAG, LOG_LIST, TOTAL_USERS, UNFOLLOWED_COUNT,
};

/// Elements a refresh writes into, looked up once at startup.
pub(crate) struct DomTargets {
    total_users: Element,
    followed: Element,
    unfollowed: Element,
    disqualified: Element,
    log_list: Element,
}

impl DomTargets {
    /// Resolve every target id; the error names the first missing one.
    pub(crate) fn resolve(document: &Document) -> Result<Self, &'static str> {
        let find = |id: &'static str| document.get_element_by_id(id).ok_or(id);
        Ok(Self {
            total_users: find(TOTAL_USERS)?,
            followed: find(FOLLOWED_COUNT)?,
            unfollowed: find(UNFOLLOWED_COUNT)?,
            disqualified: find(DISQUALIFIED_COUNT)?,
            log_list: find(LOG_LIST)?,
        })
    }

    fn counter(&self, id: &str) -> Option<&Element> {
        match id {
            TOTAL_USERS => Some(&self.total_users),
            FOLLOWED_COUNT => Some(&self.followed),
            UNFOLLOWED_COUNT => Some(&self.unfollowed),
            DISQUALIFIED_COUNT => Some(&self.disqualified),
            _ => None,
        }
    }
}

/// Writes counters and log lines as plain text nodes, so server-supplied
/// strings are never parsed as markup.
pub(crate) struct DomSink {
    document: Document,
    targets: DomTargets,
}

impl DomSink {
    pub(crate) const fn new(document: Document, targets: DomTargets) -> Self {
        Self { document, targets }
    }

    fn log_item(&self, line: &LogLine) -> Result<Element, JsValue> {
        let item = self.document.create_element(LOG_ITEM_TAG)?;
        item.set_class_name(&line.class);
        for node in log_item_nodes(line) {
            match node {
                LogNode::Span { class, text } => {
                    let span = self.document.create_element(SPAN_TAG)?;
                    span.set_class_name(&class);
                    span.set_text_content(Some(&text));
                    item.append_child(&span)?;
                }
                // `append` with a string inserts a text node, never markup.
                LogNode::Text(text) => item.append_with_str_1(&text)?,
            }
        }
        Ok(item)
    }
}

impl RenderSink for DomSink {
    fn set_counters(&self, counters: &Counters) {
        for (id, value) in counters.labelled() {
            if let Some(element) = self.targets.counter(id) {
                element.set_text_content(Some(value));
            }
        }
    }

    fn set_log_entries(&self, lines: &[LogLine]) {
        let list = &self.targets.log_list;
        list.set_text_content(None);
        for line in lines {
            if let Err(err) = self.log_item(line).and_then(|item| list.append_child(&item)) {
                console::error!("failed to render log entry", err);
            }
        }
    }

    fn show_error(&self, error: &RefreshError) {
        if error.is_transport() {
            console::error!("dashboard refresh failed", error.to_string());
        } else {
            console::warn!("dashboard refresh rejected", error.to_string());
        }
        self.set_counters(&Counters::error());
        self.set_log_entries(&[LogLine::marker(error.marker_text())]);
    }
}

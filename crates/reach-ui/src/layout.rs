//! Node layout of one log list entry.
//!
//! Log entries get styling hooks: a `timestamp` span, a `level <LEVEL>` span
//! repeating the level, then the message as a bare text node. Failure markers
//! carry no time or level and are a single text node. Every piece is text;
//! nothing here is ever parsed as markup.

use reach_monitor::LogLine;

/// Class of the span holding the local time label.
pub const TIMESTAMP_CLASS: &str = "timestamp";
/// Class shared by every level span; the level itself is appended.
pub const LEVEL_CLASS: &str = "level";
/// Tag used for the styled pieces of an entry.
pub const SPAN_TAG: &str = "span";

/// One child of a log list item, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogNode {
    /// A `<span>` with a class and text content.
    Span {
        /// Value of the `class` attribute.
        class: String,
        /// Text content.
        text: String,
    },
    /// A bare text node.
    Text(String),
}

/// Children of the list item rendering `line`.
#[must_use]
pub fn log_item_nodes(line: &LogLine) -> Vec<LogNode> {
    let mut nodes = Vec::with_capacity(4);
    if let Some(time) = &line.time {
        nodes.push(LogNode::Span {
            class: TIMESTAMP_CLASS.to_string(),
            text: time.clone(),
        });
    }
    if let Some(level) = &line.level {
        if !nodes.is_empty() {
            nodes.push(LogNode::Text(" ".to_string()));
        }
        nodes.push(LogNode::Span {
            class: format!("{LEVEL_CLASS} {level}"),
            text: level.clone(),
        });
    }
    if nodes.is_empty() {
        nodes.push(LogNode::Text(line.text.clone()));
    } else {
        nodes.push(LogNode::Text(format!(" {}", line.text)));
    }
    nodes
}

//! Element ids the dashboard page provides.

/// Text node for the total user count.
pub const TOTAL_USERS: &str = "total-users";
/// Text node for the followed count.
pub const FOLLOWED_COUNT: &str = "followed-count";
/// Text node for the unfollowed count.
pub const UNFOLLOWED_COUNT: &str = "unfollowed-count";
/// Text node for the disqualified count.
pub const DISQUALIFIED_COUNT: &str = "disqualified-count";
/// List container receiving one `<li>` per log line.
pub const LOG_LIST: &str = "log-list";

/// Counter ids in display order.
pub const COUNTER_IDS: [&str; 4] = [TOTAL_USERS, FOLLOWED_COUNT, UNFOLLOWED_COUNT, DISQUALIFIED_COUNT];

/// Tag used for log list entries.
pub const LOG_ITEM_TAG: &str = "li";

#[cfg(test)]
mod tests {
    use super::*;
    use reach_monitor::Counters;

    #[test]
    fn counter_ids_match_view_model_labels() {
        let labels = Counters::error().labelled().map(|(id, _)| id);
        assert_eq!(labels, COUNTER_IDS);
    }

    #[test]
    fn log_list_is_distinct_from_counters() {
        assert!(!COUNTER_IDS.contains(&LOG_LIST));
    }
}

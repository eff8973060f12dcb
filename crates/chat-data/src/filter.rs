//! Message selection by author and system-line policy.

use chat_core::models::{MessageSet, UserSelection};
use tracing::warn;

use crate::config::SystemMessages;

/// Messages written by `selection`, in transcript order.
///
/// [`UserSelection::Everyone`] returns the set unchanged. An author with no
/// messages yields an empty set; callers then get zero-valued aggregates.
pub fn filter_by_user(set: &MessageSet, selection: &UserSelection) -> MessageSet {
    if selection.is_everyone() {
        return set.clone();
    }
    let filtered = set.subset(|m| selection.matches(&m.author));
    if filtered.is_empty() {
        warn!("No messages found for user \"{}\"", selection);
    }
    filtered
}

/// Apply the configured policy for system lines.
pub fn apply_system_policy(set: &MessageSet, policy: SystemMessages) -> MessageSet {
    match policy {
        SystemMessages::Include => set.clone(),
        SystemMessages::Exclude => set.authored(),
    }
}

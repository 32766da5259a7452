//! Channel block-list, applied before parsing

use crate::ingester::RawMessage;
use std::collections::HashSet;

/// False iff the message's channel id is on the block list
pub fn is_allowed(message: &RawMessage, blocked_channels: &HashSet<String>) -> bool {
    match message.channel_id.as_deref() {
        Some(channel) => !blocked_channels.contains(channel),
        None => true,
    }
}

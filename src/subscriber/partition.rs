//! # Partition Routing
//!
//! Stable assignment of messages to lanes. A message's partition key is
//! hashed with 32-bit FNV-1a and reduced modulo the lane count, so every
//! message carrying the same key lands on the same lane and is processed in
//! receive order relative to its peers. Keyless messages (empty key) all hash
//! to lane `0x811c9dc5 % lane_count` and therefore share a lane too.

use std::sync::Arc;

use crate::messaging::RoutingError;
use crate::pubsub::Message;

/// Injected routing function: decoded message in, partition key out.
///
/// An error here means the message cannot be routed and is abandoned for
/// redelivery; an empty key is valid and routes like any other.
pub type PartitionKeyFn =
    Arc<dyn Fn(&dyn Message) -> Result<String, RoutingError> + Send + Sync>;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 16_777_619;

/// 32-bit FNV-1a over the UTF-8 bytes of `key`.
pub fn fnv1a_32(key: &str) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;

    for byte in key.as_bytes() {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }

    hash
}

/// Map a partition key onto one of `lane_count` lanes.
pub fn lane_index(key: &str, lane_count: usize) -> usize {
    debug_assert!(lane_count > 0);

    (fnv1a_32(key) as usize) % lane_count
}

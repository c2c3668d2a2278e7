use std::collections::{HashMap, VecDeque};

use log::{info, warn};

use crate::{
    messages::message_kind::MessageKind,
    types::{ClientId, NetworkChannel, ObjectId},
};

/// Bounds on how long, and how many, messages may wait for a single object
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BufferingPolicy {
    /// Seconds a message may wait before it is discarded
    pub max_age: f32,
    /// Messages held per object id. When full, the oldest is discarded.
    pub max_messages_per_object: usize,
}

impl Default for BufferingPolicy {
    fn default() -> Self {
        Self {
            max_age: 1.0,
            max_messages_per_object: 64,
        }
    }
}

impl BufferingPolicy {
    pub fn new(max_age: f32, max_messages_per_object: usize) -> Self {
        Self {
            max_age,
            max_messages_per_object,
        }
    }
}

/// A message that arrived for an object that was not spawned yet
#[derive(Clone, Debug, PartialEq)]
pub struct BufferedMessage {
    pub target_object_id: ObjectId,
    pub sender_id: ClientId,
    pub kind: MessageKind,
    pub channel: NetworkChannel,
    /// The complete message body, so replay decodes it exactly like a fresh arrival
    pub payload: Vec<u8>,
    pub received_at: f32,
    expires_at: f32,
}

impl BufferedMessage {
    pub fn new(
        target_object_id: ObjectId,
        sender_id: ClientId,
        kind: MessageKind,
        channel: NetworkChannel,
        payload: &[u8],
        received_at: f32,
    ) -> Self {
        Self {
            target_object_id,
            sender_id,
            kind,
            channel,
            payload: payload.to_vec(),
            received_at,
            expires_at: received_at,
        }
    }

    pub fn expires_at(&self) -> f32 {
        self.expires_at
    }
}

/// Per-object FIFO queues of messages waiting for their object to spawn.
///
/// Every message leaves the buffer exactly once: either through
/// [`MessageBuffer::consume`] or through eviction.
pub struct MessageBuffer {
    queues: HashMap<ObjectId, VecDeque<BufferedMessage>>,
    // (expiry, object) in enqueue order, expiries are not necessarily sorted
    // when policies differ between calls
    expiry_queue: VecDeque<(f32, ObjectId)>,
    evicted_count: u64,
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBuffer {
    pub fn new() -> Self {
        Self {
            queues: HashMap::new(),
            expiry_queue: VecDeque::new(),
            evicted_count: 0,
        }
    }

    pub fn enqueue(&mut self, object_id: ObjectId, mut message: BufferedMessage, policy: &BufferingPolicy) {
        if policy.max_messages_per_object == 0 {
            warn!(
                "Buffering policy holds no messages, dropping message for object {}",
                object_id
            );
            self.evicted_count += 1;
            return;
        }

        message.target_object_id = object_id;
        message.expires_at = message.received_at + policy.max_age;
        self.expiry_queue.push_back((message.expires_at, object_id));

        let queue = self.queues.entry(object_id).or_default();
        while queue.len() >= policy.max_messages_per_object {
            if queue.pop_front().is_some() {
                self.evicted_count += 1;
                warn!(
                    "Buffer for object {} is full, discarding its oldest message",
                    object_id
                );
            }
        }
        queue.push_back(message);
    }

    /// Remove and return every message waiting for `object_id`, oldest first
    pub fn consume(&mut self, object_id: ObjectId) -> Vec<BufferedMessage> {
        let Some(queue) = self.queues.remove(&object_id) else {
            return Vec::new();
        };
        self.expiry_queue
            .retain(|(_, queued_id)| *queued_id != object_id);
        if !queue.is_empty() {
            info!(
                "Replaying {} buffered message(s) for object {}",
                queue.len(),
                object_id
            );
        }
        queue.into_iter().collect()
    }

    /// Discard every message whose age bound has passed at `now`.
    /// Returns how many were discarded.
    pub fn evict_expired(&mut self, now: f32) -> usize {
        let mut evicted = 0;
        let mut touched = Vec::new();

        self.expiry_queue.retain(|(expires_at, object_id)| {
            if *expires_at <= now {
                touched.push(*object_id);
                false
            } else {
                true
            }
        });

        for object_id in touched {
            let mut remove = false;
            if let Some(queue) = self.queues.get_mut(&object_id) {
                let before = queue.len();
                queue.retain(|message| message.expires_at > now);
                evicted += before - queue.len();
                remove = queue.is_empty();
            }
            if remove {
                self.queues.remove(&object_id);
            }
        }

        if evicted > 0 {
            warn!("Discarded {} buffered message(s) that waited too long", evicted);
            self.evicted_count += evicted as u64;
        }

        evicted
    }

    pub fn contains(&self, object_id: ObjectId) -> bool {
        self.queues.contains_key(&object_id)
    }

    pub fn pending_for(&self, object_id: ObjectId) -> usize {
        self.queues.get(&object_id).map_or(0, |queue| queue.len())
    }

    /// Messages currently held, across all objects
    pub fn len(&self) -> usize {
        self.queues.values().map(|queue| queue.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    /// Messages discarded by policy since creation
    pub fn evicted_count(&self) -> u64 {
        self.evicted_count
    }

    pub fn clear(&mut self) {
        self.queues.clear();
        self.expiry_queue.clear();
    }
}

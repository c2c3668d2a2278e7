use std::collections::VecDeque;

use log::{debug, warn};

use crate::{
    dispatch::{
        context::NetworkContext,
        dispatcher::InboundMessage,
        outcome::{DispatchOutcome, DropReason},
    },
    error::NetworkError,
    messages::message_kind::MessageKind,
    rpc::error::RpcQueueError,
    types::{ClientId, HostType, NetworkChannel, SERVER_CLIENT_ID},
    world::replica_world::ReplicaWorld,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RpcQueueConfig {
    /// Frames kept before the oldest unprocessed frame is discarded
    pub max_pending_frames: usize,
    pub max_items_per_frame: usize,
}

impl Default for RpcQueueConfig {
    fn default() -> Self {
        Self {
            max_pending_frames: 8,
            max_items_per_frame: 1024,
        }
    }
}

/// An inbound RPC waiting for invocation
#[derive(Clone, Debug, PartialEq)]
pub struct RpcQueueItem {
    pub kind: MessageKind,
    pub sender_id: ClientId,
    pub channel: NetworkChannel,
    pub receive_time: f32,
    pub payload: Vec<u8>,
    pub frame: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RpcIngest {
    Queued,
    /// The authoritative side received its own RPC back
    SelfLoop,
}

struct RpcFrame {
    frame: u64,
    items: Vec<RpcQueueItem>,
}

/// Inbound RPCs grouped by the frame they arrived in, oldest frame first
pub struct RpcIngestQueue {
    config: RpcQueueConfig,
    frames: VecDeque<RpcFrame>,
    current_frame: u64,
}

impl RpcIngestQueue {
    pub fn new(config: RpcQueueConfig) -> Self {
        let mut frames = VecDeque::new();
        frames.push_back(RpcFrame {
            frame: 0,
            items: Vec::new(),
        });
        Self {
            config,
            frames,
            current_frame: 0,
        }
    }

    pub fn ingest(
        &mut self,
        host_type: HostType,
        sender_id: ClientId,
        kind: MessageKind,
        channel: NetworkChannel,
        payload: &[u8],
        receive_time: f32,
    ) -> Result<RpcIngest, RpcQueueError> {
        if !kind.is_rpc() {
            return Err(RpcQueueError::NotRpcKind { kind });
        }
        if host_type.is_authoritative() && sender_id == SERVER_CLIENT_ID {
            debug!("Ignoring {:?} looped back from the server itself", kind);
            return Ok(RpcIngest::SelfLoop);
        }

        let frame = self.current_frame;
        let capacity = self.config.max_items_per_frame;
        let current = self.current_frame_mut();
        if current.items.len() >= capacity {
            return Err(RpcQueueError::FrameFull { frame, capacity });
        }
        current.items.push(RpcQueueItem {
            kind,
            sender_id,
            channel,
            receive_time,
            payload: payload.to_vec(),
            frame,
        });
        Ok(RpcIngest::Queued)
    }

    fn current_frame_mut(&mut self) -> &mut RpcFrame {
        if self.frames.back().map(|frame| frame.frame) != Some(self.current_frame) {
            self.frames.push_back(RpcFrame {
                frame: self.current_frame,
                items: Vec::new(),
            });
        }
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Close the current frame. Items arriving afterwards belong to the next one.
    pub fn advance_frame(&mut self) {
        self.current_frame = self.current_frame.wrapping_add(1);
        self.frames.push_back(RpcFrame {
            frame: self.current_frame,
            items: Vec::new(),
        });

        while self.frames.len() > self.config.max_pending_frames.max(1) {
            if let Some(dropped) = self.frames.pop_front() {
                if !dropped.items.is_empty() {
                    warn!(
                        "Discarding {} RPC(s) from unprocessed frame {}",
                        dropped.items.len(),
                        dropped.frame
                    );
                }
            }
        }
    }

    /// Remove every item from closed frames, in arrival order. Items of the
    /// current frame stay queued.
    pub fn take_ready(&mut self) -> Vec<RpcQueueItem> {
        let mut ready = Vec::new();
        while self
            .frames
            .front()
            .is_some_and(|frame| frame.frame != self.current_frame)
        {
            if let Some(frame) = self.frames.pop_front() {
                ready.extend(frame.items);
            }
        }
        ready
    }

    pub fn current_frame(&self) -> u64 {
        self.current_frame
    }

    pub fn len(&self) -> usize {
        self.frames.iter().map(|frame| frame.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

/// ServerRpc (server)
pub fn on_server_rpc<W: ReplicaWorld>(
    context: &mut NetworkContext,
    _world: &mut W,
    message: &InboundMessage,
) -> Result<DispatchOutcome, NetworkError> {
    ingest_rpc(context, message, MessageKind::ServerRpc)
}

/// ClientRpc (client)
pub fn on_client_rpc<W: ReplicaWorld>(
    context: &mut NetworkContext,
    _world: &mut W,
    message: &InboundMessage,
) -> Result<DispatchOutcome, NetworkError> {
    ingest_rpc(context, message, MessageKind::ClientRpc)
}

fn ingest_rpc(
    context: &mut NetworkContext,
    message: &InboundMessage,
    kind: MessageKind,
) -> Result<DispatchOutcome, NetworkError> {
    let host_type = context.host_type();
    let result = context.rpc_queue.ingest(
        host_type,
        message.sender_id,
        kind,
        message.channel,
        message.payload,
        message.receive_time,
    )?;
    match result {
        RpcIngest::Queued => Ok(DispatchOutcome::Handled),
        RpcIngest::SelfLoop => Ok(DispatchOutcome::Dropped(DropReason::SelfLoop)),
    }
}

use log::{debug, info, warn};

use tessera_serde::ByteReader;

use crate::{
    connection::{
        approval::ApprovalDecision,
        continuation::{ContinuationKind, SceneLoadContinuation},
        disconnect::DisconnectReason,
        error::HandshakeError,
    },
    dispatch::{context::NetworkContext, dispatcher::InboundMessage, outcome::DispatchOutcome},
    error::NetworkError,
    events::{
        ApprovalRequestEvent, ConnectEvent, DisconnectEvent, SceneLoadRequestEvent,
        SwitchCompletedEvent,
    },
    messages::wire::{ConnectionApprovedHeader, ConnectionRequest},
    scene::error::SceneSyncError,
    world::{client_registry::ClientRecord, lifecycle, replica_world::ReplicaWorld},
};

// Server

/// ConnectionRequest. The config fingerprint is checked before anything
/// else, so a mismatched peer never reaches the approval step.
pub fn on_connection_request<W: ReplicaWorld>(
    context: &mut NetworkContext,
    _world: &mut W,
    message: &InboundMessage,
) -> Result<DispatchOutcome, NetworkError> {
    let client_id = message.sender_id;
    let mut reader = ByteReader::new(message.payload);

    let config_hash = ConnectionRequest::read_config_hash(&mut reader)?;
    if !context.config().compare_config(config_hash) {
        warn!(
            "Client {} sent config hash {:016x}, expected {:016x}. Disconnecting.",
            client_id,
            config_hash,
            context.config().config_hash()
        );
        context.events.push_disconnection(DisconnectEvent {
            client_id,
            reason: DisconnectReason::ConfigMismatch,
        });
        return Ok(DispatchOutcome::Rejected(DisconnectReason::ConfigMismatch));
    }

    if context.clients.contains(client_id) || context.approvals.is_pending_for(client_id) {
        return Err(HandshakeError::AlreadyConnected { client_id }.into());
    }

    let lifetime = context.open_client_lifetime(client_id).token();

    if context.config().connection_approval {
        let payload = ConnectionRequest::read_approval_payload(&mut reader)?;
        let ticket = context.approvals.open(client_id, lifetime);
        debug!("Client {} is waiting for approval ({:?})", client_id, ticket);
        context.events.push_approval_request(ApprovalRequestEvent {
            ticket,
            client_id,
            payload,
        });
        return Ok(DispatchOutcome::Suspended);
    }

    let ticket = context.approvals.open(client_id, lifetime);
    let decision = ApprovalDecision::server_default(context.config());
    context.resolve_approval(ticket, decision, message.receive_time)?;
    Ok(DispatchOutcome::Handled)
}

// Client

/// ConnectionApproved. Registers the local client, syncs the clock and
/// either applies the snapshot now or parks it until the server's scene
/// has been loaded.
pub fn on_connection_approved<W: ReplicaWorld>(
    context: &mut NetworkContext,
    world: &mut W,
    message: &InboundMessage,
) -> Result<DispatchOutcome, NetworkError> {
    let scene_management = context.config().enable_scene_management;
    let mut reader = ByteReader::new(message.payload);
    let header = ConnectionApprovedHeader::read(&mut reader, scene_management)?;

    context.clock.sync(header.server_time, message.receive_time);
    context.begin_local_connection(header.local_client_id);
    context
        .clients
        .register(ClientRecord::new(header.local_client_id, message.receive_time))?;

    match header.scene {
        Some((scene_index, token)) if scene_index != context.active_scene_index() => {
            info!(
                "Connection approved as client {}, loading scene {} first",
                header.local_client_id, scene_index
            );
            let continuation = SceneLoadContinuation::new(
                ContinuationKind::InitialSync,
                scene_index,
                token,
                context.local_lifetime().token(),
                &reader,
            );
            context.scenes.suspend(continuation);
            context
                .events
                .push_scene_load_request(SceneLoadRequestEvent { scene_index, token });
            Ok(DispatchOutcome::Suspended)
        }
        scene => {
            finish_initial_sync(context, world, &mut reader)?;
            if let Some((_, token)) = scene {
                context.clients.set_scene_load_complete(header.local_client_id, true)?;
                context.events.push_switch_completed(SwitchCompletedEvent { token });
            }
            Ok(DispatchOutcome::Handled)
        }
    }
}

pub(crate) fn finish_initial_sync<W: ReplicaWorld>(
    context: &mut NetworkContext,
    world: &mut W,
    reader: &mut ByteReader,
) -> Result<(), NetworkError> {
    lifecycle::apply_object_snapshot(context, world, reader)?;

    context.mark_connected();
    let client_id = context.local_client_id();
    info!("Connected as client {}", client_id);
    context.events.push_connection(ConnectEvent { client_id });
    Ok(())
}

/// Run the continuations parked by ConnectionApproved or SwitchScene, then
/// acknowledge the switch the loaded scene belongs to
pub(crate) fn resume_after_scene_load<W: ReplicaWorld>(
    context: &mut NetworkContext,
    world: &mut W,
) -> Result<(), NetworkError> {
    let continuations = context.scenes.take_pending();
    let Some(latest) = continuations.last() else {
        return Err(SceneSyncError::NoPendingSceneLoad.into());
    };
    let (scene_index, token) = (latest.scene_index(), latest.token());

    if let Some(cancelled) = continuations.iter().find(|continuation| !continuation.is_live()) {
        return Err(NetworkError::ContinuationCancelled {
            continuation: cancelled.kind().name(),
            client_id: context.local_client_id(),
        });
    }

    context.set_active_scene(scene_index);
    context.scenes.release_transient_objects();

    for continuation in &continuations {
        let mut reader = continuation.remainder().borrow();
        match continuation.kind() {
            ContinuationKind::InitialSync => finish_initial_sync(context, world, &mut reader)?,
            ContinuationKind::SceneSwitch => {
                lifecycle::apply_object_snapshot(context, world, &mut reader)?
            }
        }
    }

    let local_client_id = context.local_client_id();
    context.clients.set_scene_load_complete(local_client_id, true)?;
    context
        .events
        .push_switch_completed(SwitchCompletedEvent { token });
    Ok(())
}

use log::{debug, info};

use tessera_serde::{ByteReader, Serde};

use crate::{
    connection::continuation::{ContinuationKind, SceneLoadContinuation},
    dispatch::{
        context::NetworkContext,
        dispatcher::InboundMessage,
        outcome::{DispatchOutcome, DropReason},
    },
    error::NetworkError,
    events::{ClientSceneLoadedEvent, SceneLoadRequestEvent},
    messages::wire::SwitchSceneHeader,
    scene::{scene_barrier::SwitchAck, switch_token::SceneSwitchToken},
    world::replica_world::ReplicaWorld,
};

/// SwitchScene (client). The object list is parked until the scene has loaded.
pub fn on_switch_scene<W: ReplicaWorld>(
    context: &mut NetworkContext,
    _world: &mut W,
    message: &InboundMessage,
) -> Result<DispatchOutcome, NetworkError> {
    let mut reader = ByteReader::new(message.payload);
    let header = SwitchSceneHeader::de(&mut reader)?;

    info!("Server requested scene {}", header.scene_index);
    let continuation = SceneLoadContinuation::new(
        ContinuationKind::SceneSwitch,
        header.scene_index,
        header.token,
        context.local_lifetime().token(),
        &reader,
    );
    context.scenes.suspend(continuation);
    let local_client_id = context.local_client_id();
    if let Some(record) = context.clients.get_mut(local_client_id) {
        record.is_scene_load_complete = false;
    }
    context.events.push_scene_load_request(SceneLoadRequestEvent {
        scene_index: header.scene_index,
        token: header.token,
    });
    Ok(DispatchOutcome::Suspended)
}

/// ClientSwitchSceneCompleted (server)
pub fn on_client_switch_scene_completed<W: ReplicaWorld>(
    context: &mut NetworkContext,
    _world: &mut W,
    message: &InboundMessage,
) -> Result<DispatchOutcome, NetworkError> {
    let client_id = message.sender_id;
    let mut reader = ByteReader::new(message.payload);
    let token = SceneSwitchToken::de(&mut reader)?;

    match context.scenes.on_switch_completed(client_id, token) {
        SwitchAck::Completed => {
            context.clients.set_scene_load_complete(client_id, true)?;
            debug!("Client {} finished loading its scene", client_id);
            context
                .events
                .push_client_scene_loaded(ClientSceneLoadedEvent { client_id, token });
            Ok(DispatchOutcome::Handled)
        }
        SwitchAck::Stale | SwitchAck::Unexpected => {
            Ok(DispatchOutcome::Dropped(DropReason::StaleSwitchToken))
        }
    }
}

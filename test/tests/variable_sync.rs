use proptest::prelude::*;

use tessera_shared::{
    BufferingPolicy, DispatchOutcome, DropReason, ErrorEvent, MessageKind, NetworkConfig,
    NetworkError, WorldError, SERVER_CLIENT_ID,
};
use tessera_test::{init_logger, payloads, TestPeer, TestWorld, WorldCall};

fn connected_client(config: NetworkConfig) -> TestPeer {
    let mut client = TestPeer::client(config);
    client.connect_as(3, &[]);
    client
}

#[test]
fn known_object_receives_delta_and_update() {
    init_logger();
    let mut client = TestPeer::client(NetworkConfig::default());
    client.world = TestWorld::with_behaviours(2);
    client.connect_as(3, &[]);
    let add = payloads::add_object(&payloads::prefab(5, 0, 1), client.identity_mode());
    client.receive(0, MessageKind::AddObject, &add, 0.0).unwrap();

    let delta = payloads::variable(5, 1, &[1, 2]);
    let update = payloads::variable(5, 0, &[3]);
    assert_eq!(
        client.receive(0, MessageKind::NetworkVariableDelta, &delta, 0.1),
        Ok(DispatchOutcome::Handled)
    );
    assert_eq!(
        client.receive(0, MessageKind::NetworkVariableUpdate, &update, 0.2),
        Ok(DispatchOutcome::Handled)
    );

    let applied: Vec<&WorldCall> = client
        .world
        .calls
        .iter()
        .filter(|call| matches!(call, WorldCall::Delta { .. } | WorldCall::Update { .. }))
        .collect();
    assert_eq!(
        applied,
        vec![
            &WorldCall::Delta {
                object_id: 5,
                behaviour_index: 1,
                sender_id: 0,
                bytes: vec![1, 2],
            },
            &WorldCall::Update {
                object_id: 5,
                behaviour_index: 0,
                sender_id: 0,
                bytes: vec![3],
            },
        ]
    );
}

#[test]
fn invalid_behaviour_index_is_dropped() {
    let mut client = connected_client(NetworkConfig::default());
    let add = payloads::add_object(&payloads::prefab(5, 0, 1), client.identity_mode());
    client.receive(0, MessageKind::AddObject, &add, 0.0).unwrap();

    let delta = payloads::variable(5, 1, &[9]);
    assert_eq!(
        client.receive(0, MessageKind::NetworkVariableDelta, &delta, 0.1),
        Ok(DispatchOutcome::Dropped(DropReason::InvalidBehaviour {
            object_id: 5,
            behaviour_index: 1,
        }))
    );
    assert!(client.world.variable_payloads(5).is_empty());
}

#[test]
fn unknown_object_on_server_is_never_buffered() {
    let mut server = TestPeer::server(NetworkConfig::default());
    let delta = payloads::variable(7, 0, &[1]);

    assert_eq!(
        server.receive(2, MessageKind::NetworkVariableDelta, &delta, 0.0),
        Ok(DispatchOutcome::Dropped(DropReason::UnknownObject(7)))
    );
    assert!(server.context.buffer().is_empty());
}

#[test]
fn unknown_object_with_buffering_disabled_is_dropped() {
    let mut client = connected_client(NetworkConfig::builder().message_buffering(false).build());
    let update = payloads::variable(7, 0, &[1]);

    assert_eq!(
        client.receive(0, MessageKind::NetworkVariableUpdate, &update, 0.0),
        Ok(DispatchOutcome::Dropped(DropReason::UnknownObject(7)))
    );
    assert!(client.context.buffer().is_empty());
}

#[test]
fn variables_disabled_drops_before_decoding() {
    let mut client = connected_client(NetworkConfig::builder().network_variables(false).build());

    // not even a valid header
    assert_eq!(
        client.receive(0, MessageKind::NetworkVariableDelta, &[], 0.0),
        Ok(DispatchOutcome::Dropped(DropReason::FeatureDisabled))
    );
}

#[test]
fn expired_buffered_messages_are_not_replayed() {
    let policy = BufferingPolicy::new(0.5, 16);
    let mut client = connected_client(NetworkConfig::builder().buffering_policy(policy).build());

    let early = payloads::variable(7, 0, &[1]);
    let late = payloads::variable(7, 0, &[2]);
    client.receive(0, MessageKind::NetworkVariableDelta, &early, 0.0).unwrap();
    client.receive(0, MessageKind::NetworkVariableDelta, &late, 0.4).unwrap();

    // dispatching at 0.6 evicts the first message before the spawn is handled
    let add = payloads::add_object(&payloads::prefab(7, 0, 1), client.identity_mode());
    client.receive(0, MessageKind::AddObject, &add, 0.6).unwrap();

    assert_eq!(client.world.variable_payloads(7), vec![vec![2]]);
    assert_eq!(client.context.buffer().evicted_count(), 1);
}

#[test]
fn buffered_message_is_applied_exactly_once() {
    let mut client = connected_client(NetworkConfig::default());
    let delta = payloads::variable(7, 0, &[1]);
    client.receive(0, MessageKind::NetworkVariableDelta, &delta, 0.0).unwrap();

    let add = payloads::add_object(&payloads::prefab(7, 0, 1), client.identity_mode());
    client.receive(0, MessageKind::AddObject, &add, 0.1).unwrap();
    client.receive(0, MessageKind::DestroyObject, &payloads::destroy_object(7), 0.2).unwrap();
    client.receive(0, MessageKind::AddObject, &add, 0.3).unwrap();

    assert_eq!(client.world.variable_payloads(7), vec![vec![1]]);
}

#[test]
fn failed_replay_does_not_lose_later_messages() {
    init_logger();
    let mut client = connected_client(NetworkConfig::default());
    client.world.rejected_variable_payloads.insert(vec![2]);

    for (i, bytes) in [[1u8], [2], [3]].iter().enumerate() {
        let delta = payloads::variable(7, 0, bytes);
        client
            .receive(0, MessageKind::NetworkVariableDelta, &delta, i as f32 * 0.1)
            .unwrap();
    }
    let early = payloads::variable(8, 0, &[4]);
    client.receive(0, MessageKind::NetworkVariableDelta, &early, 0.3).unwrap();

    let spawns = [payloads::prefab(7, 0, 1), payloads::prefab(8, 0, 1)];
    let add = payloads::add_objects(&spawns, client.identity_mode());
    assert_eq!(
        client.receive(0, MessageKind::AddObjects, &add, 0.4),
        Ok(DispatchOutcome::Handled)
    );

    assert_eq!(client.world.variable_payloads(7), vec![vec![1], vec![3]]);
    assert_eq!(client.world.variable_payloads(8), vec![vec![4]]);
    assert_eq!(
        client.drain::<ErrorEvent>(),
        vec![ErrorEvent {
            sender_id: 0,
            error: NetworkError::World(WorldError::rejected("bad variable payload [2]")),
        }]
    );
    assert!(client.context.buffer().is_empty());
}

proptest! {
    #[test]
    fn buffered_messages_replay_in_arrival_order(
        markers in prop::collection::vec(any::<u8>(), 1..32),
        use_update in prop::collection::vec(any::<bool>(), 32),
    ) {
        let mut client = connected_client(NetworkConfig::default());

        for (index, marker) in markers.iter().enumerate() {
            let kind = if use_update[index] {
                MessageKind::NetworkVariableUpdate
            } else {
                MessageKind::NetworkVariableDelta
            };
            let payload = payloads::variable(11, 0, &[*marker]);
            let outcome = client.receive(SERVER_CLIENT_ID, kind, &payload, 0.0).unwrap();
            prop_assert_eq!(outcome, DispatchOutcome::Buffered);
        }

        let add = payloads::add_object(&payloads::prefab(11, 0, 1), client.identity_mode());
        client.receive(SERVER_CLIENT_ID, MessageKind::AddObject, &add, 0.0).unwrap();

        let replayed: Vec<u8> = client
            .world
            .variable_payloads(11)
            .into_iter()
            .map(|bytes| bytes[0])
            .collect();
        prop_assert_eq!(replayed, markers.clone());

        for (index, call) in client
            .world
            .calls
            .iter()
            .filter(|call| matches!(call, WorldCall::Delta { .. } | WorldCall::Update { .. }))
            .enumerate()
        {
            prop_assert_eq!(matches!(call, WorldCall::Update { .. }), use_update[index]);
        }
        prop_assert!(client.context.buffer().is_empty());
    }
}

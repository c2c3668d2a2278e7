use proptest::prelude::*;

use tessera_shared::{
    DispatchOutcome, DropReason, MessageKind, NetworkConfig, NetworkError, ObjectId,
    RegistryError, WorldError,
};
use tessera_test::{init_logger, payloads, TestPeer, WorldCall};

fn connected_client() -> TestPeer {
    let mut client = TestPeer::client(NetworkConfig::default());
    client.connect_as(3, &[]);
    client
}

#[test]
fn destroy_unknown_object_is_a_noop() {
    init_logger();
    let mut client = connected_client();
    let calls_before = client.world.calls.len();

    assert_eq!(
        client.receive(0, MessageKind::DestroyObject, &payloads::destroy_object(99), 0.0),
        Ok(DispatchOutcome::Dropped(DropReason::UnknownObject(99)))
    );
    assert_eq!(client.world.calls.len(), calls_before);
}

#[test]
fn destroy_objects_skips_unknown_ids() {
    let mut client = connected_client();
    let spawns = [payloads::prefab(1, 0, 5), payloads::prefab(2, 0, 5)];
    let add = payloads::add_objects(&spawns, client.identity_mode());
    client.receive(0, MessageKind::AddObjects, &add, 0.0).unwrap();

    let destroy = payloads::destroy_objects(&[2, 40, 1]);
    assert_eq!(
        client.receive(0, MessageKind::DestroyObjects, &destroy, 0.1),
        Ok(DispatchOutcome::Handled)
    );
    assert!(client.context.objects().is_empty());
    assert_eq!(client.world.count(&WorldCall::Despawn(2)), 1);
    assert_eq!(client.world.count(&WorldCall::Despawn(1)), 1);
}

#[test]
fn duplicate_spawn_keeps_the_existing_object() {
    let mut client = connected_client();
    let first = payloads::add_object(&payloads::prefab(1, 3, 5), client.identity_mode());
    let second = payloads::add_object(&payloads::prefab(1, 0, 6), client.identity_mode());
    client.receive(0, MessageKind::AddObject, &first, 0.0).unwrap();

    assert_eq!(
        client.receive(0, MessageKind::AddObject, &second, 0.1),
        Err(NetworkError::Registry(RegistryError::ObjectAlreadySpawned { object_id: 1 }))
    );
    assert_eq!(client.context.objects().get(1).unwrap().owner_id(), 3);
    assert_eq!(client.world.spawned(), vec![1]);
}

#[test]
fn rejected_prefab_registers_nothing() {
    let mut client = connected_client();
    client.world.rejected_prefabs.insert(77);
    let add = payloads::add_object(&payloads::prefab(1, 0, 77), client.identity_mode());

    let result = client.receive(0, MessageKind::AddObject, &add, 0.0);
    assert!(matches!(result, Err(NetworkError::World(WorldError::Rejected { .. }))));
    assert!(!client.context.objects().contains(1));
}

#[test]
fn trailing_payload_reaches_the_world() {
    let mut client = connected_client();
    let spawn = payloads::prefab(4, 0, 5)
        .with_payload(&[7, 7, 7]);
    let add = payloads::add_object(&spawn, client.identity_mode());
    client.receive(0, MessageKind::AddObject, &add, 0.0).unwrap();

    assert_eq!(client.world.objects[&4].payload, Some(vec![7, 7, 7]));
}

#[test]
fn truncated_batch_is_a_decode_error() {
    let mut client = connected_client();
    let spawns = [payloads::prefab(1, 0, 5), payloads::prefab(2, 0, 5)];
    let mut add = payloads::add_objects(&spawns, client.identity_mode());
    add.truncate(add.len() - 1);

    assert!(matches!(
        client.receive(0, MessageKind::AddObjects, &add, 0.0),
        Err(NetworkError::Decode(_))
    ));
    // objects before the truncation point were already applied
    assert!(client.context.objects().contains(1));
}

#[test]
fn add_objects_is_a_server_to_client_message() {
    let mut server = TestPeer::server(NetworkConfig::default());
    let add = payloads::add_objects(&[payloads::prefab(1, 0, 5)], server.identity_mode());

    assert_eq!(
        server.receive(4, MessageKind::AddObjects, &add, 0.0),
        Ok(DispatchOutcome::Dropped(DropReason::WrongRole(MessageKind::AddObjects)))
    );
    assert!(server.world.calls.is_empty());
}

proptest! {
    #[test]
    fn add_objects_spawns_each_descriptor_in_order(
        ids in prop::collection::hash_set(1u64..10_000, 0..24),
        buffered in prop::collection::vec(0u8..3, 24),
    ) {
        let ids: Vec<ObjectId> = ids.into_iter().collect();
        let mut client = connected_client();

        // a few deltas per object arrive before the batch
        for (index, object_id) in ids.iter().enumerate() {
            for marker in 0..buffered[index] {
                let delta = payloads::variable(*object_id, 0, &[marker]);
                client.receive(0, MessageKind::NetworkVariableDelta, &delta, 0.0).unwrap();
            }
        }

        let spawns: Vec<_> = ids.iter().map(|id| payloads::prefab(*id, 0, 9)).collect();
        let add = payloads::add_objects(&spawns, client.identity_mode());
        client.receive(0, MessageKind::AddObjects, &add, 0.0).unwrap();

        prop_assert_eq!(client.world.spawned(), ids.clone());
        prop_assert_eq!(client.context.objects().len(), ids.len());

        // each object's buffered deltas are applied right after its spawn
        let mut expected = Vec::new();
        for (index, object_id) in ids.iter().enumerate() {
            expected.push(WorldCall::Spawn(*object_id));
            for marker in 0..buffered[index] {
                expected.push(WorldCall::Delta {
                    object_id: *object_id,
                    behaviour_index: 0,
                    sender_id: 0,
                    bytes: vec![marker],
                });
            }
        }
        let recorded: Vec<WorldCall> = client
            .world
            .calls
            .iter()
            .filter(|call| matches!(call, WorldCall::Spawn(_) | WorldCall::Delta { .. }))
            .cloned()
            .collect();
        prop_assert_eq!(recorded, expected);
        prop_assert!(client.context.buffer().is_empty());
    }
}

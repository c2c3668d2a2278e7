use tessera_shared::{
    DispatchOutcome, MessageKind, NetworkConfig, ObjectIdentity, SpawnPose, Vec3,
    SERVER_CLIENT_ID,
};
use tessera_test::{init_logger, payloads, TestPeer, WorldCall};

#[test]
fn delta_before_spawn_is_replayed_after_player_spawn() {
    init_logger();

    let mut client = TestPeer::client(NetworkConfig::default());
    client.connect_as(3, &[]);

    let field_bytes = [0xAA, 0xBB, 0xCC];
    let delta = payloads::variable(7, 0, &field_bytes);
    let outcome = client
        .receive(SERVER_CLIENT_ID, MessageKind::NetworkVariableDelta, &delta, 0.1)
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Buffered);
    assert_eq!(client.context.buffer().pending_for(7), 1);
    assert!(client.world.variable_payloads(7).is_empty());

    let spawn = payloads::player(7, 3, 42, Vec3::new(1.0, 2.0, 3.0));
    let add = payloads::add_object(&spawn, client.identity_mode());
    let outcome = client
        .receive(SERVER_CLIENT_ID, MessageKind::AddObject, &add, 0.2)
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Handled);

    let tail: Vec<WorldCall> = client
        .world
        .calls
        .iter()
        .skip_while(|call| **call != WorldCall::Spawn(7))
        .cloned()
        .collect();
    assert_eq!(
        tail,
        vec![
            WorldCall::Spawn(7),
            WorldCall::Delta {
                object_id: 7,
                behaviour_index: 0,
                sender_id: SERVER_CLIENT_ID,
                bytes: field_bytes.to_vec(),
            },
        ]
    );
    assert_eq!(client.context.buffer().pending_for(7), 0);
    assert!(client.context.buffer().is_empty());

    let spawned = &client.world.objects[&7];
    assert!(spawned.descriptor.is_player_object);
    assert_eq!(spawned.descriptor.owner_id, 3);
    assert_eq!(spawned.descriptor.identity, ObjectIdentity::PrefabHash(42));
    assert_eq!(
        spawned.descriptor.spawn_pose,
        Some(SpawnPose::new(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO))
    );

    let object = client.context.objects().get(7).unwrap();
    assert_eq!(object.owner_id(), 3);
    assert_eq!(client.context.clients().get(3).unwrap().player_object, Some(7));
}

use std::collections::HashMap;

use crate::{
    types::{ClientId, ObjectId},
    world::error::RegistryError,
};

#[derive(Clone, Debug, PartialEq)]
pub struct ClientRecord {
    pub client_id: ClientId,
    /// Set once the client acknowledges its current scene switch
    pub is_scene_load_complete: bool,
    pub connected_at: f32,
    pub player_object: Option<ObjectId>,
}

impl ClientRecord {
    pub fn new(client_id: ClientId, connected_at: f32) -> Self {
        Self {
            client_id,
            is_scene_load_complete: false,
            connected_at,
            player_object: None,
        }
    }
}

/// Connected clients, keyed by id
#[derive(Default)]
pub struct ClientRegistry {
    clients: HashMap<ClientId, ClientRecord>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
        }
    }

    pub fn contains(&self, client_id: ClientId) -> bool {
        self.clients.contains_key(&client_id)
    }

    pub fn get(&self, client_id: ClientId) -> Option<&ClientRecord> {
        self.clients.get(&client_id)
    }

    pub fn get_mut(&mut self, client_id: ClientId) -> Option<&mut ClientRecord> {
        self.clients.get_mut(&client_id)
    }

    pub fn register(&mut self, record: ClientRecord) -> Result<(), RegistryError> {
        let client_id = record.client_id;
        if self.clients.contains_key(&client_id) {
            return Err(RegistryError::ClientAlreadyRegistered { client_id });
        }
        self.clients.insert(client_id, record);
        Ok(())
    }

    pub fn remove(&mut self, client_id: ClientId) -> Result<ClientRecord, RegistryError> {
        self.clients
            .remove(&client_id)
            .ok_or(RegistryError::ClientNotFound { client_id })
    }

    pub fn set_scene_load_complete(
        &mut self,
        client_id: ClientId,
        complete: bool,
    ) -> Result<(), RegistryError> {
        let record = self
            .clients
            .get_mut(&client_id)
            .ok_or(RegistryError::ClientNotFound { client_id })?;
        record.is_scene_load_complete = complete;
        Ok(())
    }

    pub fn client_ids(&self) -> Vec<ClientId> {
        let mut ids: Vec<ClientId> = self.clients.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn clear(&mut self) {
        self.clients.clear();
    }
}

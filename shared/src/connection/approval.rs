use std::collections::HashMap;

use crate::{
    config::NetworkConfig,
    connection::lifetime::LifetimeToken,
    types::{ClientId, Vec3},
};

/// Handle for an approval the application has not answered yet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApprovalTicket(pub u64);

/// The application's answer to a connection request
#[derive(Clone, Debug, PartialEq)]
pub struct ApprovalDecision {
    pub approved: bool,
    pub create_player_object: bool,
    /// `None` selects the default player prefab
    pub player_prefab_hash: Option<u64>,
    pub position: Option<Vec3>,
    pub rotation: Option<Vec3>,
}

impl ApprovalDecision {
    pub fn approve() -> Self {
        Self {
            approved: true,
            create_player_object: false,
            player_prefab_hash: None,
            position: None,
            rotation: None,
        }
    }

    pub fn deny() -> Self {
        Self {
            approved: false,
            ..Self::approve()
        }
    }

    pub fn with_player_object(mut self, prefab_hash: Option<u64>) -> Self {
        self.create_player_object = true;
        self.player_prefab_hash = prefab_hash;
        self
    }

    pub fn at(mut self, position: Vec3, rotation: Vec3) -> Self {
        self.position = Some(position);
        self.rotation = Some(rotation);
        self
    }

    /// The decision used when connection approval is not configured
    pub fn server_default(config: &NetworkConfig) -> Self {
        Self {
            approved: true,
            create_player_object: config.create_player_object,
            player_prefab_hash: config.player_prefab_hash,
            position: config.default_spawn_position,
            rotation: None,
        }
    }
}

pub(crate) struct PendingApproval {
    pub client_id: ClientId,
    pub lifetime: LifetimeToken,
}

/// Approvals waiting on the application, keyed by ticket
#[derive(Default)]
pub(crate) struct ApprovalTable {
    pending: HashMap<ApprovalTicket, PendingApproval>,
    next_ticket: u64,
}

impl ApprovalTable {
    pub fn open(&mut self, client_id: ClientId, lifetime: LifetimeToken) -> ApprovalTicket {
        let ticket = ApprovalTicket(self.next_ticket);
        self.next_ticket = self.next_ticket.wrapping_add(1);
        self.pending.insert(ticket, PendingApproval { client_id, lifetime });
        ticket
    }

    pub fn take(&mut self, ticket: ApprovalTicket) -> Option<PendingApproval> {
        self.pending.remove(&ticket)
    }

    pub fn is_pending_for(&self, client_id: ClientId) -> bool {
        self.pending
            .values()
            .any(|pending| pending.client_id == client_id && pending.lifetime.is_live())
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

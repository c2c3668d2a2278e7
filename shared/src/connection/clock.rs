use tessera_serde::{ByteReader, Serde};

use crate::{
    dispatch::{context::NetworkContext, dispatcher::InboundMessage, outcome::DispatchOutcome},
    error::NetworkError,
    world::replica_world::ReplicaWorld,
};

/// Estimate of the server's clock, kept as an offset from local time
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkClock {
    offset: f32,
    synced: bool,
    smoothing: f32,
}

impl NetworkClock {
    pub fn new(smoothing: f32) -> Self {
        Self {
            offset: 0.0,
            synced: false,
            smoothing: smoothing.clamp(0.0, 1.0),
        }
    }

    /// Feed one observation of the server's time. The first observation is
    /// taken as is, later ones only move the estimate part of the way.
    pub fn sync(&mut self, net_time: f32, local_time: f32) {
        let target = net_time - local_time;
        if self.synced {
            self.offset += (target - self.offset) * self.smoothing;
        } else {
            self.offset = target;
            self.synced = true;
        }
    }

    pub fn network_time(&self, local_time: f32) -> f32 {
        local_time + self.offset
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
        self.synced = false;
    }
}

/// TimeSync (client)
pub fn on_time_sync<W: ReplicaWorld>(
    context: &mut NetworkContext,
    _world: &mut W,
    message: &InboundMessage,
) -> Result<DispatchOutcome, NetworkError> {
    let mut reader = ByteReader::new(message.payload);
    let net_time = f32::de(&mut reader)?;
    context.clock.sync(net_time, message.receive_time);
    Ok(DispatchOutcome::Handled)
}

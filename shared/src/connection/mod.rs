pub mod approval;
pub mod clock;
pub mod continuation;
pub mod disconnect;
pub mod error;
pub mod handshake;
pub mod lifetime;

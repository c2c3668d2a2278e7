pub mod error;
pub mod scene_barrier;
pub mod scene_switch;
pub mod switch_token;

pub mod test_world;

pub use helpers::*;
pub use test_world::{TestObject, TestWorld, WorldCall};

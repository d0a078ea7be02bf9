// CollectLog - app/mod.rs
//
// Application layer: option resolution and collection orchestration.
// Dependencies: core layer, platform layer.

pub mod collect;
pub mod options;

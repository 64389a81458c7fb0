pub mod frequency_chain;
pub mod slot_arena;

pub use frequency_chain::{DEFAULT_BUCKET_PREALLOC, FrequencyChain};
pub use slot_arena::{SlotArena, SlotId};

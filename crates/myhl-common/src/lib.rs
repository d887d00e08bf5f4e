// Common module -- shared types and the network message layer.
pub mod q_shared;
pub mod qcommon;
pub mod common;

// Client module -- server-to-client effect message handling.
pub mod ref_def;
pub mod cl_tent;

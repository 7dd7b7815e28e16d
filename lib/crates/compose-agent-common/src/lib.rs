//! Wire types shared by the compose agent server and its remote client.

pub mod types;

pub use types::*;

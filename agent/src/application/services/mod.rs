//! Application services: use-case orchestration over port traits.

pub mod compose;

pub use compose::ComposeService;

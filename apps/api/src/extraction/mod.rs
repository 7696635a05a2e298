// Role-title extraction from pasted job descriptions.
// Pure and synchronous: safe to call from any handler without spawn_blocking.

pub mod role;

pub use role::extract_role;

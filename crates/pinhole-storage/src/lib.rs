//! Link registry backends.

pub mod memory;

pub use memory::InMemoryRegistry;
pub use pinhole_core::LinkRegistry;

pub mod revocation;

pub use revocation::{MemoryRevocationStore, RevocationStore};

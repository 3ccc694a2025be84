//! Product facades. One small entry type per API surface, all sharing the
//! same configuration and REST executor; the WebSocket products hand out
//! session handles from [`crate::live`].

pub mod agent;
pub mod listen;
pub mod manage;
pub mod read;
pub mod speak;

pub use agent::Agent;
pub use listen::Listen;
pub use manage::Manage;
pub use read::Read;
pub use speak::Speak;

#[macro_use]
extern crate log;
extern crate parking_lot;
extern crate repguard;

mod clock;
mod memory_lock;
mod replication;

pub use clock::ManualClock;
pub use memory_lock::MemoryZombieLock;
pub use replication::memory::{MemoryConnection, MemoryReplicationManager};
pub use replication::static_table::{StaticTableReplicationManager, TcpConnection};

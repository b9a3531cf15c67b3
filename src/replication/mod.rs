use crate::errors::Result;

/// Replication role of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display)]
pub enum NodeRole {
    Primary,
    Standby,
}

/// Standby registration as listed by the replication manager.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Display)]
#[display(fmt = "Standby {} ({})", id, address)]
pub struct StandbyInfo {
    /// Registration id.
    pub id: u64,

    /// Address used to probe the standby.
    pub address: String,
}

/// Connection to a database node. Dropping an open connection closes it.
pub trait NodeConnection: Send + 'static {
    fn close(self);
}

/// Replication manager abstraction: role lookup, topology, connections and
/// standby unregistration. Implementations own the per-call timeouts.
pub trait ReplicationManager: Send + 'static {
    type Connection: NodeConnection;

    /// Opens the connection to the local node.
    fn local_connection(&self) -> Result<Self::Connection>;

    /// Opens a connection to a remote node. Used to probe standbys.
    fn remote_connection(&self, address: &str) -> Result<Self::Connection>;

    fn current_role(&self, connection: &Self::Connection) -> Result<NodeRole>;

    /// Registered standbys in the order the replication manager returns them.
    fn standbys(&self, connection: &Self::Connection) -> Result<Vec<StandbyInfo>>;

    /// Removes the standby from the cluster membership.
    fn unregister_standby(&self, id: u64) -> Result<()>;
}

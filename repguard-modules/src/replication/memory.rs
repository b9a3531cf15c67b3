use parking_lot::Mutex;
use repguard::{new_err, ErrorKind, GuardError, NodeConnection, NodeRole, ReplicationManager, StandbyInfo};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug)]
struct ClusterState {
    role: NodeRole,
    standbys: Vec<StandbyInfo>,
    unreachable: HashSet<String>,
    failing_unregister: HashSet<u64>,
    role_check_fails: bool,
    topology_fails: bool,
    unregistered: Vec<u64>,
    open_connections: usize,
}

/// In-memory replication manager with scriptable failures. Clones share the state, so a
/// test keeps a clone to steer the cluster while the cleaner owns the other.
#[derive(Clone, Debug)]
pub struct MemoryReplicationManager {
    state: Arc<Mutex<ClusterState>>,
}

/// Connection handle counted by the owning MemoryReplicationManager.
#[derive(Debug)]
pub struct MemoryConnection {
    address: String,
    state: Arc<Mutex<ClusterState>>,
}

impl MemoryConnection {
    pub fn address(&self) -> &str {
        &self.address
    }
}

impl NodeConnection for MemoryConnection {
    fn close(self) {
        // counted on drop
    }
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        state.open_connections -= 1;
    }
}

impl MemoryReplicationManager {
    pub fn new(role: NodeRole, standbys: Vec<StandbyInfo>) -> MemoryReplicationManager {
        let state = ClusterState {
            role,
            standbys,
            unreachable: HashSet::new(),
            failing_unregister: HashSet::new(),
            role_check_fails: false,
            topology_fails: false,
            unregistered: Vec::new(),
            open_connections: 0,
        };

        MemoryReplicationManager {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn set_role(&self, role: NodeRole) {
        self.state.lock().role = role;
    }

    pub fn set_reachable(&self, address: &str, reachable: bool) {
        let mut state = self.state.lock();
        if reachable {
            state.unreachable.remove(address);
        } else {
            state.unreachable.insert(address.to_string());
        }
    }

    pub fn set_role_check_fails(&self, fails: bool) {
        self.state.lock().role_check_fails = fails;
    }

    pub fn set_topology_fails(&self, fails: bool) {
        self.state.lock().topology_fails = fails;
    }

    pub fn set_unregister_fails(&self, id: u64, fails: bool) {
        let mut state = self.state.lock();
        if fails {
            state.failing_unregister.insert(id);
        } else {
            state.failing_unregister.remove(&id);
        }
    }

    /// Registers a standby the way a newly attached replica would.
    pub fn register_standby(&self, standby: StandbyInfo) {
        self.state.lock().standbys.push(standby);
    }

    /// Drops a standby from the listing without going through unregistration.
    pub fn remove_standby_externally(&self, id: u64) {
        self.state.lock().standbys.retain(|standby| standby.id != id);
    }

    pub fn registered_standbys(&self) -> Vec<StandbyInfo> {
        self.state.lock().standbys.clone()
    }

    /// Ids unregistered through the manager, in call order.
    pub fn unregistered(&self) -> Vec<u64> {
        self.state.lock().unregistered.clone()
    }

    pub fn open_connections(&self) -> usize {
        self.state.lock().open_connections
    }

    fn open(&self, address: &str) -> MemoryConnection {
        self.state.lock().open_connections += 1;

        MemoryConnection {
            address: address.to_string(),
            state: self.state.clone(),
        }
    }
}

impl ReplicationManager for MemoryReplicationManager {
    type Connection = MemoryConnection;

    fn local_connection(&self) -> Result<MemoryConnection, GuardError> {
        Ok(self.open("local"))
    }

    fn remote_connection(&self, address: &str) -> Result<MemoryConnection, GuardError> {
        if self.state.lock().unreachable.contains(address) {
            return new_err(ErrorKind::Replication, format!("cannot connect to {}", address),
                           "connection refused".to_string());
        }

        Ok(self.open(address))
    }

    fn current_role(&self, _connection: &MemoryConnection) -> Result<NodeRole, GuardError> {
        let state = self.state.lock();
        if state.role_check_fails {
            return new_err(ErrorKind::Replication, "cannot query node role".to_string(), String::new());
        }

        Ok(state.role)
    }

    fn standbys(&self, _connection: &MemoryConnection) -> Result<Vec<StandbyInfo>, GuardError> {
        let state = self.state.lock();
        if state.topology_fails {
            return new_err(ErrorKind::Replication, "cannot list standbys".to_string(), String::new());
        }

        Ok(state.standbys.clone())
    }

    fn unregister_standby(&self, id: u64) -> Result<(), GuardError> {
        let mut state = self.state.lock();
        if state.failing_unregister.contains(&id) {
            return new_err(ErrorKind::Replication, format!("cannot unregister standby {}", id), String::new());
        }

        state.standbys.retain(|standby| standby.id != id);
        state.unregistered.push(id);
        info!("Memory replication manager: standby {} unregistered", id);
        Ok(())
    }
}

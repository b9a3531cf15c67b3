use parking_lot::Mutex;
use repguard::{new_err, ErrorKind, GuardError, NodeConnection, NodeRole, ReplicationManager, StandbyInfo};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

/// Open TCP connection to a database node.
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
}

impl NodeConnection for TcpConnection {
    fn close(self) {
        if let Err(err) = self.stream.shutdown(Shutdown::Both) {
            trace!("Connection shutdown failed: {}", err);
        }
    }
}

/// Replication manager backed by a static standby table. The role is set by the host
/// process; standbys are probed with a plain TCP connect; unregistration drops the
/// standby from the table.
#[derive(Clone, Debug)]
pub struct StaticTableReplicationManager {
    local_address: String,
    connect_timeout: Duration,
    role: Arc<Mutex<NodeRole>>,
    table: Arc<Mutex<Vec<StandbyInfo>>>,
}

impl StaticTableReplicationManager {
    pub fn new(local_address: String, role: NodeRole, table: Vec<StandbyInfo>, connect_timeout: Duration)
        -> StaticTableReplicationManager {
        StaticTableReplicationManager {
            local_address,
            connect_timeout,
            role: Arc::new(Mutex::new(role)),
            table: Arc::new(Mutex::new(table)),
        }
    }

    pub fn set_role(&self, role: NodeRole) {
        *self.role.lock() = role;
    }

    fn connect(&self, address: &str) -> Result<TcpConnection, GuardError> {
        let socket_address = match address.to_socket_addrs() {
            Ok(mut addresses) => addresses.next(),
            Err(err) => return new_err(ErrorKind::Replication,
                                       format!("cannot resolve {}", address), err.to_string()),
        };

        let socket_address = match socket_address {
            Some(socket_address) => socket_address,
            None => return new_err(ErrorKind::Replication,
                                   format!("cannot resolve {}", address), "no addresses".to_string()),
        };

        match TcpStream::connect_timeout(&socket_address, self.connect_timeout) {
            Ok(stream) => Ok(TcpConnection { stream }),
            Err(err) => new_err(ErrorKind::Replication, format!("cannot connect to {}", address), err.to_string()),
        }
    }
}

impl ReplicationManager for StaticTableReplicationManager {
    type Connection = TcpConnection;

    fn local_connection(&self) -> Result<TcpConnection, GuardError> {
        self.connect(&self.local_address)
    }

    fn remote_connection(&self, address: &str) -> Result<TcpConnection, GuardError> {
        self.connect(address)
    }

    fn current_role(&self, _connection: &TcpConnection) -> Result<NodeRole, GuardError> {
        Ok(*self.role.lock())
    }

    fn standbys(&self, _connection: &TcpConnection) -> Result<Vec<StandbyInfo>, GuardError> {
        Ok(self.table.lock().clone())
    }

    fn unregister_standby(&self, id: u64) -> Result<(), GuardError> {
        let mut table = self.table.lock();
        let count = table.len();
        table.retain(|standby| standby.id != id);

        if table.len() == count {
            return new_err(ErrorKind::Replication, format!("standby {} is not registered", id), String::new());
        }

        info!("Standby {} removed from the static table", id);
        Ok(())
    }
}

use std::thread::JoinHandle;
use std::thread;
use crossbeam_channel::{Sender, Receiver};

/// Background worker handle: the thread and its termination channel.
#[derive(Debug)]
pub struct Worker {
    pub join_handle : JoinHandle<()>,
    pub terminate_worker_tx : Sender<()>
}

impl Worker {
    /// Sends the termination signal. The worker finishes its current call and exits.
    pub fn terminate(&self) {
        let send_result = self.terminate_worker_tx.send(());
        if send_result.is_err() {
            error!("Cannot send termination signal")
        }
    }

    pub fn join(self) {
        let join_result = self.join_handle.join();
        if join_result.is_err() {
            error!("Worker returned an error")
        }
    }
}

pub fn run_worker<T: Send + 'static, F: FnOnce(T, Receiver<()>) + Send + 'static>(worker : F, params : T) -> Worker {
    let (terminate_worker_tx, terminate_worker_rx): (Sender<()>, Receiver<()>) = crossbeam_channel::unbounded();

    let join_handle = thread::spawn(move|| worker (params, terminate_worker_rx));

    Worker{join_handle, terminate_worker_tx}
}

/// Non-blocking check of the termination channel. A dropped sender counts as termination.
pub fn termination_requested(terminate_worker_rx : &Receiver<()>) -> bool {
    match terminate_worker_rx.try_recv() {
        Ok(()) => true,
        Err(crossbeam_channel::TryRecvError::Empty) => false,
        Err(crossbeam_channel::TryRecvError::Disconnected) => true,
    }
}

//! Owner Thread Task Runner
//!
//! All frame state mutation and remote dispatch happens on one designated
//! thread. A [`TaskRunner`] is the cloneable handle other threads use to post
//! work to it. Tasks posted from a single thread run in the order they were
//! posted.
//!
//! Two ways to provide the owner thread:
//! - [`OwnerThread::spawn`] starts a dedicated named thread.
//! - [`TaskRunner::current_thread`] adopts the calling thread; the embedder
//!   then pumps tasks from its own loop with [`TaskPump::run_until_idle`].

use crate::config::RunnerConfig;
use std::thread::{self, JoinHandle, ThreadId};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

/// Unit of work executed on the owner thread.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

enum RunnerCommand {
    Run(Task),
    Quit,
}

/// Handle for posting tasks to the owner thread.
#[derive(Clone)]
pub struct TaskRunner {
    sender: UnboundedSender<RunnerCommand>,
    owner: ThreadId,
}

impl std::fmt::Debug for TaskRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRunner")
            .field("owner", &self.owner)
            .finish()
    }
}

impl TaskRunner {
    /// Make the calling thread the owner thread.
    pub fn current_thread() -> (TaskRunner, TaskPump) {
        let (sender, receiver) = unbounded_channel();
        let owner = thread::current().id();
        (TaskRunner { sender, owner }, TaskPump { receiver, owner })
    }

    pub fn runs_tasks_on_current_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Queue `task` for the owner thread. Returns false if the owner thread is gone.
    pub fn post<F>(&self, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.sender.send(RunnerCommand::Run(Box::new(task))).is_ok()
    }
}

/// Receiving side of a runner created with [`TaskRunner::current_thread`].
pub struct TaskPump {
    receiver: UnboundedReceiver<RunnerCommand>,
    owner: ThreadId,
}

impl TaskPump {
    /// Run every task currently queued, including tasks queued by those tasks.
    ///
    /// Returns the number of tasks executed. Does nothing when called off the
    /// owner thread.
    pub fn run_until_idle(&mut self) -> usize {
        if thread::current().id() != self.owner {
            warn!("Task pump driven from a foreign thread; ignoring");
            return 0;
        }

        let mut executed = 0;
        while let Ok(command) = self.receiver.try_recv() {
            match command {
                RunnerCommand::Run(task) => {
                    task();
                    executed += 1;
                }
                RunnerCommand::Quit => break,
            }
        }
        executed
    }
}

/// Dedicated owner thread.
///
/// Stops after draining the tasks posted before [`OwnerThread::shutdown`] or drop.
pub struct OwnerThread {
    runner: TaskRunner,
    handle: Option<JoinHandle<()>>,
}

impl OwnerThread {
    pub fn spawn(config: &RunnerConfig) -> std::io::Result<Self> {
        let (sender, mut receiver) = unbounded_channel::<RunnerCommand>();
        let handle = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || {
                while let Some(command) = receiver.blocking_recv() {
                    match command {
                        RunnerCommand::Run(task) => task(),
                        RunnerCommand::Quit => break,
                    }
                }
                debug!("Owner thread exiting");
            })?;

        let runner = TaskRunner {
            sender,
            owner: handle.thread().id(),
        };
        debug!(thread = %config.thread_name, "Owner thread started");

        Ok(Self {
            runner,
            handle: Some(handle),
        })
    }

    pub fn runner(&self) -> TaskRunner {
        self.runner.clone()
    }

    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.runner.sender.send(RunnerCommand::Quit);
            if handle.join().is_err() {
                warn!("Owner thread panicked");
            }
        }
    }
}

impl Drop for OwnerThread {
    fn drop(&mut self) {
        self.stop();
    }
}

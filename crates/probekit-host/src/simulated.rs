//! Host backed by the simulated controller

use crate::host::ControllerHost;
use crate::simulator::{snapshot_of, RunReport, SimulatedController, VariableTable};
use async_trait::async_trait;
use parking_lot::Mutex;
use probekit_core::HostError;
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Host running submitted programs on a [`SimulatedController`]
///
/// Submission returns as soon as the program is queued; the run happens on
/// a blocking task and its variables become visible in the snapshot as they
/// are assigned.
pub struct SimulatedHost {
    controller: Arc<Mutex<SimulatedController>>,
    variables: VariableTable,
    last_run: Arc<Mutex<Option<Result<RunReport, HostError>>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SimulatedHost {
    /// Wrap a simulated controller
    pub fn new(controller: SimulatedController) -> Self {
        let variables = controller.variables();
        Self {
            controller: Arc::new(Mutex::new(controller)),
            variables,
            last_run: Arc::new(Mutex::new(None)),
            task: Mutex::new(None),
        }
    }

    /// Outcome of the most recent run, once it has finished
    pub fn last_run(&self) -> Option<Result<RunReport, HostError>> {
        self.last_run.lock().clone()
    }

    /// True while a submitted program is still executing
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }

    /// Wait for the running program, if any, to finish
    pub async fn join(&self) -> Result<(), HostError> {
        let task = self.task.lock().take();
        if let Some(task) = task {
            task.await.map_err(|e| HostError::IoError {
                reason: format!("simulation task failed: {}", e),
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl ControllerHost for SimulatedHost {
    fn name(&self) -> &str {
        "simulator"
    }

    async fn submit_program(&self, program: &str) -> Result<(), HostError> {
        if self.is_running() {
            return Err(HostError::Busy);
        }

        // clear before returning so no poll can observe the previous job
        self.variables.write().clear();
        *self.last_run.lock() = None;

        let controller = Arc::clone(&self.controller);
        let last_run = Arc::clone(&self.last_run);
        let program = program.to_string();

        let handle = tokio::task::spawn_blocking(move || {
            let result = controller.lock().run(&program);
            if let Err(e) = &result {
                error!("Simulated run failed: {}", e);
            }
            *last_run.lock() = Some(result);
        });
        *self.task.lock() = Some(handle);

        debug!("Program queued on simulator");
        Ok(())
    }

    async fn config_snapshot(&self) -> Result<Value, HostError> {
        Ok(snapshot_of(&self.variables))
    }
}

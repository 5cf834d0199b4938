#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open the job stream for a freshly reset run.
    StartRun { run_id: crate::RunId },
    /// The run reached its terminal outcome; the busy flag has been cleared.
    RunSettled { run_id: crate::RunId },
}

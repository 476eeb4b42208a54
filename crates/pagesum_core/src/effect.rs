use crate::JobRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand the job to the background worker (fire-and-forget).
    DispatchJob(JobRequest),
}

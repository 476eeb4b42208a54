#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The shared status record was read (on open) or changed.
    StatusObserved(crate::JobStatus),
    /// User pressed the summarise trigger.
    SummariseClicked(crate::JobRequest),
    /// Background worker acknowledged (or refused) a dispatch.
    DispatchAcked(crate::DispatchAck),
}

pub mod document_poller;
pub mod job_submitter;
pub mod operator_gate;
pub mod retry_budget;

pub use document_poller::DocumentPoller;
pub use job_submitter::JobSubmitter;
pub use operator_gate::OperatorGate;
pub use retry_budget::RetryBudget;

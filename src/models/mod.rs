pub mod artifact;
pub mod device_status;
pub mod job;
pub mod output_kind;
pub mod scan_request;

pub use artifact::Artifact;
pub use device_status::DeviceStatus;
pub use job::JobHandle;
pub use output_kind::OutputKind;
pub use scan_request::{ScanRegion, ScanRequest};

//! Runtime adapters and the transport-agnostic API surface.

pub mod api;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_spawner;

pub use api::{
    health, queue_view, release, submit, ErrorResponse, Health, IntOrString, QueueEntryView,
    ReleasePayload, ReleaseResponse, SubmitRequestPayload, SubmitResponse,
};
#[cfg(feature = "tokio-runtime")]
pub use tokio_spawner::TokioSpawner;

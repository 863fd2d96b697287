//! Application Layer - Use Cases

pub mod config;
pub mod kyc_status;
pub mod reconcile_event;
pub mod start_session;
pub mod track_completion;

pub use kyc_status::{KycStatusOutput, KycStatusUseCase};
pub use reconcile_event::ReconcileIdentityEventUseCase;
pub use start_session::{StartKycSessionUseCase, StartSessionInput, StartSessionOutput};
pub use track_completion::{TrackCompletionUseCase, TrackOutcome};

// Application layer - Use case interactors

pub mod clip_interactor;
pub mod container;
pub mod quota;
pub mod run_interactor;

// Re-export interactors
pub use clip_interactor::ClipInteractor;
pub use container::{AppContainer, DefaultAppContainer};
pub use quota::{ClipQuota, OutputLayout};
pub use run_interactor::{RunInteractor, RunSummary};

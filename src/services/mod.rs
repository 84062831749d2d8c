pub mod logo_pass;
pub mod run_lock;

pub use logo_pass::{LogoPassCoordinator, PassCounters, PassReason, PassSummary, PassTrigger};
pub use run_lock::{RunLock, RunLockGuard};

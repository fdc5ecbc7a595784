//! Public SDK surface for the campus tour guide.
//!
//! Re-exports the storage, config and core crates and wires them together
//! into a single [`TourGuide`] handle.

mod app;

pub use app::{TourGuide, open_store};
/// Re-export for convenience.
pub use tourguide_config as config;
pub use tourguide_core as core;
/// Re-export for convenience.
pub use tourguide_storage as storage;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}

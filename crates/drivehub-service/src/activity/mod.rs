//! Activity logging: best-effort recording and owner-scoped listings.

pub mod recorder;
pub mod service;

pub use recorder::ActivityRecorder;
pub use service::ActivityService;

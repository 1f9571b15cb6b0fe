//! Client-resident session layer: the inactivity timeout monitor and the
//! session status tracker backing the countdown notice.

pub mod monitor;
pub mod status;

pub use monitor::{InactivityMonitor, MonitorConfig, MonitorEvent, SessionActions};
pub use status::{ActivityTracker, SessionStatus};

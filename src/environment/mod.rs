pub mod controller;
pub mod monitor;

pub use controller::EnvironmentController;
pub use monitor::EnvironmentMonitor;

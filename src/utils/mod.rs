pub mod throttle;
pub mod time;
pub mod timer;

pub use throttle::Throttle;
pub use time::format_time;
pub use timer::HideTimer;

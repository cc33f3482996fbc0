pub mod timer;
pub use timer::{FrameStats, HighPrecisionTimer, ManualTimer, Timer};

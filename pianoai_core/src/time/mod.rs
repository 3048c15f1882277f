pub mod clock;
pub mod source;

pub use clock::{Clock, Phase, TickOutcome};
pub use source::{ManualTimeSource, SystemTimeSource, TimeSource};

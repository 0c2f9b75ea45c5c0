pub mod observer;
pub mod dome;

pub use observer::{Clock, SystemClock, FixedClock, ObserverState, TimeSource};
pub use dome::{SkyDome, SkySnapshot, BodyPosition, Placement};

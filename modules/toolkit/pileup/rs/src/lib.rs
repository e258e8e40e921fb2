pub use builder::EngineBuilder;
pub use engine::{Engine, Outcome};
pub use extension::{Extension, Fragment};
pub use result::{Pileup, Summary};
pub use store::{Read, ReadStore, ReadTrack};
pub use sweep::{pileup, Sweep, SweepStats, Track};

mod builder;
mod engine;
mod extension;
mod result;
mod store;
mod sweep;
mod worker;

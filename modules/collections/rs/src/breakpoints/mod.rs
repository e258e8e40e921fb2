pub use breakpoints::{Breakpoints, BreakpointsBuilder};
pub use identical::{Exact, Identical, Tolerance};

#[allow(clippy::module_inception)]
mod breakpoints;
mod identical;

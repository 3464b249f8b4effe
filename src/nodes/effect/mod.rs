mod envelope;
mod filter;
mod gain;
mod mixer;
mod panner;

pub use envelope::*;
pub use filter::*;
pub use gain::*;
pub use mixer::*;
pub use panner::*;

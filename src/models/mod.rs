pub mod partition;
pub mod utterance;

pub use partition::*;
pub use utterance::*;

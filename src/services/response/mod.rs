pub mod contract;
pub mod envelope;

pub use contract::Contract;
pub use envelope::{ResponseEncoder, ResponseEnvelope};

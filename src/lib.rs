pub mod algebra;
pub mod config;
pub mod constants;
pub mod error;
pub mod gadget;
pub mod verify;

pub use config::VerifierConfig;
pub use error::{Result, VerifierError};
pub use gadget::{parse, ParsedGadget};

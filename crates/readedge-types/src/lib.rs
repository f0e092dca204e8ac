pub mod command;
pub mod types;

pub use command::{Command, InputMode};
pub use types::*;

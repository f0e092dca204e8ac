pub mod controller;
pub mod events;
pub mod io;
pub mod session;
pub mod state;
pub mod ui;

pub use state::AppState;

#[cfg(test)]
mod tests;

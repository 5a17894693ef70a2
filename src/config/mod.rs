//! Options handed through `consume` to the binding library.

mod loader;
mod types;

pub use loader::OptionsError;
pub use types::ConnectOptions;

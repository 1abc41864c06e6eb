// Rotodraft application layer: configuration, keeper saves and the terminal
// draft session.

pub mod config;
pub mod driver;
pub mod saves;

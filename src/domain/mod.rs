pub mod method;
pub mod ports;
pub mod session;
pub mod state;

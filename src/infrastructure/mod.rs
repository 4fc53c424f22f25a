pub mod backend;
pub mod scripted;
pub mod stripe;

pub mod client;
pub mod options;

pub mod results;
pub mod scoring;
pub mod server;

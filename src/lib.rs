pub mod cli;
pub mod config;
pub mod error;
pub mod request;
pub mod submit;
pub mod util;

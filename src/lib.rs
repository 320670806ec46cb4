pub mod badge;
pub mod config;
pub mod logging;
pub mod openvsx;

pub mod apps;
pub mod config;
pub mod divide;
pub mod next;
pub mod outputs;
pub mod status;

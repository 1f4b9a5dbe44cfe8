pub mod clock;
pub mod config;
pub mod error;
pub mod ids;
pub mod intro;
pub mod model;
pub mod storage;
pub mod store;
pub mod transfer;

pub mod config;
pub mod control;
pub mod network;
pub mod storage;

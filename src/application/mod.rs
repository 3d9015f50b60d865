pub mod list;
pub mod run;
pub mod transform;
pub mod unload;

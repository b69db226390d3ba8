pub mod component;
pub mod config;
pub mod constitution;
pub mod decision;
pub mod draft;
pub mod error;
pub mod id;
pub mod io;
pub mod item;
pub mod milestone;
pub mod paths;
pub mod plan;
pub mod requirement;
pub mod spec;
pub mod store;
pub mod types;
pub mod validate;

pub use error::{Result, SpecError};

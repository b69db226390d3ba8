pub mod draft;
pub mod init;
pub mod item;
pub mod mcp;
pub mod spec;
pub mod validate;

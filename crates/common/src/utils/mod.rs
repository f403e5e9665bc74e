pub mod headers;
pub mod logging;

pub mod metric;
pub mod sample;
pub mod evaluation;
pub mod config;

pub use metric::*;
pub use sample::*;
pub use evaluation::*;
pub use config::*;

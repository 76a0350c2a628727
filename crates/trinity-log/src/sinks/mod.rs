//! Log sinks: where formatted lines end up

mod traits;
mod console;
mod file;
mod memory;

pub use traits::{Sink, SharedSink};
pub use console::{ConsoleSink, ConsoleTarget};
pub use file::FileSink;
pub use memory::MemorySink;

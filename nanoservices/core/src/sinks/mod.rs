pub mod file;
pub mod log;
pub mod traits;

pub use traits::Sink;

use crate::registry::SinkFactory;

/// Register the sinks shipped with the crate.
pub fn register_builtin(factory: &mut SinkFactory) {
    factory
        .register("file", file::FileSink::from_config)
        .register("log", log::LogSink::from_config);
}

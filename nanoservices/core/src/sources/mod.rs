use gatherflow_utils::error::Error;
use gatherflow_utils::{GatherFlowResult, Item, RunSummary};

pub mod file;
pub mod http_client;
pub mod static_list;
pub mod traits;

pub use traits::Source;

use crate::registry::SourceFactory;
use crate::sinks::Sink;

/// Register the sources shipped with the crate.
pub fn register_builtin(factory: &mut SourceFactory) {
    factory
        .register("static", static_list::StaticSource::from_config)
        .register("file", file::FileSource::from_config)
        .register("http", http_client::HttpSource::from_config);
}

/// Push items one by one, in order, into `sink`.
///
/// Every item is attempted even after a failure; the run fails when any push
/// failed, carrying the first error.
pub async fn push_all(sink: &dyn Sink, items: Vec<Item>) -> GatherFlowResult<RunSummary> {
    let total = items.len();
    let mut failed = 0;
    let mut first: Option<Error> = None;

    for item in items {
        let key = item.key.clone();
        if let Err(e) = sink.accept(item).await {
            tracing::debug!(key = %key, error = %e, "item rejected downstream");
            failed += 1;
            first.get_or_insert(e);
        }
    }

    match first {
        Some(first) => Err(Error::RunFailed { failed, total, first: Box::new(first) }),
        None => Ok(RunSummary { produced: total }),
    }
}

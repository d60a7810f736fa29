pub mod key_pattern;
pub mod range;
pub mod traits;

pub use traits::Filter;

use crate::registry::FilterFactory;

/// Register the filters shipped with the crate.
pub fn register_builtin(factory: &mut FilterFactory) {
    factory
        .register("range", range::RangeFilter::from_config)
        .register("key_pattern", key_pattern::KeyPatternFilter::from_config);
}

pub mod drop_nulls;
pub mod scale;
pub mod split;
pub mod traits;

pub use traits::Transform;

use crate::registry::TransformFactory;

/// Register the transforms shipped with the crate.
pub fn register_builtin(factory: &mut TransformFactory) {
    factory
        .register("scale", scale::Scale::from_config)
        .register("split", split::Split::from_config)
        .register("drop_nulls", drop_nulls::DropNulls::from_config);
}

pub mod custody;
pub mod price_resolver;
pub mod relayer_meter;

pub use custody::*;
pub use price_resolver::*;
pub use relayer_meter::*;

#[cfg(test)]
mod component_tests;

//! Sports festival application layer
//!
//! Use cases that drive the domain in `sf-core` through its ports.

pub mod deps;
pub mod usecases;

pub use deps::AppDeps;
pub use usecases::UseCases;

#[cfg(test)]
pub(crate) mod test_support;

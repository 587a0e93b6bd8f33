//! Sports festival registration client: bootstrap and command line.
//!
//! Domain logic lives in `sf-core`, use cases in `sf-app` and adapters in
//! `sf-infra`; this crate wires them together.

pub mod bootstrap;
pub mod cli;

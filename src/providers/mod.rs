//! Route provider module
//!
//! Defines the provider traits and the adapters for each upstream provider.

mod loader;
mod registry;
mod timestamp;
mod traits;

pub mod provider_one;
pub mod provider_two;

pub use loader::ProviderLoader;
pub use provider_one::ProviderOne;
pub use provider_two::ProviderTwo;
pub use registry::ProviderRegistry;
pub use traits::*;

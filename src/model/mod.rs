// Re-export all model types from submodules.

pub use nav::{NavOutcome, NavStack, Screen, ScreenEvent};
pub use resource::{Account, Environment, Install, ParentRef, Site, available_environments};

mod nav;
mod resource;

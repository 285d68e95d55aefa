//! Bindings between controls and scene fields

mod binding;
mod registry;

pub use binding::{Binding, BindingError, BindingId};
pub use registry::{ControlSlot, InputRegistry};

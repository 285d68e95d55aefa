//! Scene fields that bindings drive
//!
//! A [`FieldStore`] exposes typed fields of named objects. [`SceneStore`] is the
//! file-backed implementation used by the command line tool.

mod scene;
mod store;
mod value;

pub use scene::{SceneField, SceneObject, SceneStore};
pub use store::FieldStore;
pub use value::{FieldDescriptor, FieldError, FieldKind, FieldValue};

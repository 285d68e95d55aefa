//! FieldStore trait

use super::{FieldDescriptor, FieldError, FieldValue};

/// Typed access to the fields of named objects
pub trait FieldStore {
    /// Whether the store holds an object with this name
    fn contains(&self, object: &str) -> bool;

    /// All fields of an object, in declaration order
    fn list_fields(&self, object: &str) -> Result<Vec<FieldDescriptor>, FieldError>;

    /// Fields a control can drive (integer, boolean, float, enum), in order
    fn list_numeric_fields(&self, object: &str) -> Result<Vec<FieldDescriptor>, FieldError> {
        Ok(self
            .list_fields(object)?
            .into_iter()
            .filter(|field| field.kind.is_numeric())
            .collect())
    }

    /// Read a field value
    fn read_field(&self, object: &str, path: &str) -> Result<FieldValue, FieldError>;

    /// Write a field value and mark the owning object dirty.
    /// The value must have the same kind as the stored one.
    fn write_field(&mut self, object: &str, path: &str, value: FieldValue) -> Result<(), FieldError>;

    /// Whether the object was written since it was last persisted
    fn is_dirty(&self, object: &str) -> bool;
}

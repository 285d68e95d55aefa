//! A single control-to-field binding

use std::fmt;

use thiserror::Error;

use crate::fields::{FieldError, FieldKind, FieldStore, FieldValue};

/// Identity of a binding within a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub(crate) u64);

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors raised while configuring or applying a binding
#[derive(Debug, Error, PartialEq)]
pub enum BindingError {
    #[error("binding has no target object")]
    MissingTarget,

    #[error("binding has no field selected")]
    MissingField,

    #[error("field index {index} is out of range ({count} selectable fields)")]
    FieldIndexOutOfRange { index: usize, count: usize },

    #[error("'{0}' is not a selectable numeric field of the target")]
    NotSelectable(String),

    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Pairs one control with one field of one object
///
/// `value` is the accumulated control position, in field units. During a live
/// session it is the authoritative state; the field only mirrors it.
///
/// Equality is structural and ignores the id, so two freshly created bindings
/// compare equal.
#[derive(Debug, Clone)]
pub struct Binding {
    id: BindingId,
    target: Option<String>,
    field_index: Option<usize>,
    field_path: Option<String>,
    selectable_fields: Vec<String>,
    scale: i32,
    value: f64,
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
            && self.field_index == other.field_index
            && self.field_path == other.field_path
            && self.selectable_fields == other.selectable_fields
            && self.scale == other.scale
            && self.value == other.value
    }
}

impl Binding {
    pub(crate) fn new(id: BindingId) -> Self {
        Self {
            id,
            target: None,
            field_index: None,
            field_path: None,
            selectable_fields: Vec::new(),
            scale: 1,
            value: 0.0,
        }
    }

    pub fn id(&self) -> BindingId {
        self.id
    }

    /// Still in the state `create_binding` left it in
    pub fn is_empty(&self) -> bool {
        *self == Binding::new(self.id)
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn field_path(&self) -> Option<&str> {
        self.field_path.as_deref()
    }

    pub fn field_index(&self) -> Option<usize> {
        self.field_index
    }

    /// Numeric fields of the target, in store order
    pub fn selectable_fields(&self) -> &[String] {
        &self.selectable_fields
    }

    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Change sensitivity. Only affects movements sampled afterwards.
    pub fn set_scale(&mut self, scale: i32) {
        self.scale = scale;
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Add a raw control movement, scaled by this binding's scale factor
    pub fn accumulate(&mut self, raw_delta: f64) {
        self.value += self.scale as f64 * raw_delta;
    }

    /// Point the binding at another object.
    ///
    /// Any field selection is dropped and the selectable set is rebuilt from
    /// the new target's numeric fields. Setting the current target is a no-op.
    pub fn rebind_target(
        &mut self,
        target: Option<&str>,
        store: &dyn FieldStore,
    ) -> Result<(), BindingError> {
        if self.target.as_deref() == target {
            return Ok(());
        }

        let selectable = match target {
            Some(object) => store
                .list_numeric_fields(object)?
                .into_iter()
                .map(|field| field.path)
                .collect(),
            None => Vec::new(),
        };

        self.target = target.map(str::to_string);
        self.field_index = None;
        self.field_path = None;
        self.selectable_fields = selectable;
        Ok(())
    }

    /// Select a field by its position in the selectable set
    pub fn select_field(&mut self, index: usize) -> Result<(), BindingError> {
        if self.field_index == Some(index) {
            return Ok(());
        }
        let path = self
            .selectable_fields
            .get(index)
            .ok_or(BindingError::FieldIndexOutOfRange {
                index,
                count: self.selectable_fields.len(),
            })?
            .clone();
        self.field_index = Some(index);
        self.field_path = Some(path);
        Ok(())
    }

    /// Select a field by path
    pub fn select_field_path(&mut self, path: &str) -> Result<(), BindingError> {
        let index = self
            .selectable_fields
            .iter()
            .position(|p| p == path)
            .ok_or_else(|| BindingError::NotSelectable(path.to_string()))?;
        self.select_field(index)
    }

    fn location(&self) -> Result<(&str, &str), BindingError> {
        let target = self.target.as_deref().ok_or(BindingError::MissingTarget)?;
        let path = self.field_path.as_deref().ok_or(BindingError::MissingField)?;
        Ok((target, path))
    }

    /// Write the accumulated value into the bound field
    pub fn apply(&self, store: &mut dyn FieldStore) -> Result<(), BindingError> {
        let (target, path) = self.location()?;
        let current = store.read_field(target, path)?;
        let next = self.field_value_like(&current, path)?;
        store.write_field(target, path, next)?;
        Ok(())
    }

    /// Pull the bound field's current value into the binding
    pub fn restore(&mut self, store: &dyn FieldStore) -> Result<(), BindingError> {
        let (target, path) = self.location()?;
        let current = store.read_field(target, path)?;
        let value = match current {
            FieldValue::Float(x) => x,
            FieldValue::Integer(i) => i as f64,
            FieldValue::Boolean(b) => {
                if b {
                    self.scale as f64
                } else {
                    0.0
                }
            }
            FieldValue::Enum { index, .. } => index as f64,
            FieldValue::Text(_) => {
                return Err(FieldError::TypeMismatch {
                    path: path.to_string(),
                    expected: FieldKind::Float,
                    found: FieldKind::Text,
                }
                .into())
            }
        };
        self.value = value;
        Ok(())
    }

    /// Convert the accumulated value to the kind of `current`
    fn field_value_like(&self, current: &FieldValue, path: &str) -> Result<FieldValue, BindingError> {
        let value = match current {
            FieldValue::Float(_) => FieldValue::Float(self.value),
            FieldValue::Integer(_) => FieldValue::Integer(self.value.round() as i64),
            FieldValue::Boolean(_) => FieldValue::Boolean(self.value > self.scale as f64 / 2.0),
            FieldValue::Enum { variants, .. } => {
                let rounded = self.value.round();
                if rounded < 0.0 {
                    return Err(FieldError::NegativeEnumIndex {
                        path: path.to_string(),
                        value: rounded as i64,
                    }
                    .into());
                }
                FieldValue::Enum {
                    index: rounded as usize,
                    variants: variants.clone(),
                }
            }
            FieldValue::Text(_) => {
                return Err(FieldError::TypeMismatch {
                    path: path.to_string(),
                    expected: FieldKind::Text,
                    found: FieldKind::Float,
                }
                .into())
            }
        };
        Ok(value)
    }
}

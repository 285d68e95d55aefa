//! File-backed scene of named objects and their fields

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use super::{FieldDescriptor, FieldError, FieldStore, FieldValue};

/// A named field of a scene object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneField {
    pub path: String,
    pub value: FieldValue,
}

/// An object in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,

    #[serde(default)]
    pub fields: Vec<SceneField>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field (builder pattern)
    pub fn with_field(mut self, path: impl Into<String>, value: FieldValue) -> Self {
        self.fields.push(SceneField {
            path: path.into(),
            value,
        });
        self
    }

    fn field(&self, path: &str) -> Option<&SceneField> {
        self.fields.iter().find(|f| f.path == path)
    }

    fn field_mut(&mut self, path: &str) -> Option<&mut SceneField> {
        self.fields.iter_mut().find(|f| f.path == path)
    }
}

/// In-memory scene implementing [`FieldStore`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneStore {
    #[serde(default)]
    objects: Vec<SceneObject>,

    #[serde(skip)]
    dirty: BTreeSet<String>,
}

impl SceneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object (builder pattern)
    pub fn with_object(mut self, object: SceneObject) -> Self {
        self.objects.push(object);
        self
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Objects written since load or the last [`clear_dirty`](Self::clear_dirty)
    pub fn dirty_objects(&self) -> Vec<&str> {
        self.dirty.iter().map(String::as_str).collect()
    }

    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    /// Reject duplicate object names and duplicate field paths
    pub fn validate(&self) -> Result<()> {
        let mut names = BTreeSet::new();
        for object in &self.objects {
            if !names.insert(object.name.as_str()) {
                bail!("Scene has more than one object named '{}'", object.name);
            }
            let mut paths = BTreeSet::new();
            for field in &object.fields {
                if !paths.insert(field.path.as_str()) {
                    bail!("Object '{}' has more than one field '{}'", object.name, field.path);
                }
                if let FieldValue::Enum { index, variants } = &field.value {
                    if *index >= variants.len() {
                        bail!(
                            "Enum field '{}.{}' index {} is out of range",
                            object.name,
                            field.path,
                            index
                        );
                    }
                }
            }
        }
        Ok(())
    }

    /// Load a scene from YAML, or JSON when the extension is `.json`
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene {:?}", path))?;
        let scene: SceneStore = if is_json(path) {
            serde_json::from_str(&contents)?
        } else {
            serde_yaml::from_str(&contents)?
        };
        scene.validate()?;
        Ok(scene)
    }

    /// Write the scene back in the format its extension names, and mark it clean
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let contents = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            serde_yaml::to_string(self)?
        };
        std::fs::write(path, contents).with_context(|| format!("Failed to write scene {:?}", path))?;
        self.clear_dirty();
        Ok(())
    }

    fn object(&self, name: &str) -> Result<&SceneObject, FieldError> {
        self.objects
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| FieldError::UnknownObject(name.to_string()))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

impl FieldStore for SceneStore {
    fn contains(&self, object: &str) -> bool {
        self.objects.iter().any(|o| o.name == object)
    }

    fn list_fields(&self, object: &str) -> Result<Vec<FieldDescriptor>, FieldError> {
        Ok(self
            .object(object)?
            .fields
            .iter()
            .map(|f| FieldDescriptor {
                path: f.path.clone(),
                kind: f.value.kind(),
            })
            .collect())
    }

    fn read_field(&self, object: &str, path: &str) -> Result<FieldValue, FieldError> {
        self.object(object)?
            .field(path)
            .map(|f| f.value.clone())
            .ok_or_else(|| FieldError::UnknownField {
                object: object.to_string(),
                path: path.to_string(),
            })
    }

    fn write_field(&mut self, object: &str, path: &str, value: FieldValue) -> Result<(), FieldError> {
        let target = self
            .objects
            .iter_mut()
            .find(|o| o.name == object)
            .ok_or_else(|| FieldError::UnknownObject(object.to_string()))?;
        let field = target.field_mut(path).ok_or_else(|| FieldError::UnknownField {
            object: object.to_string(),
            path: path.to_string(),
        })?;

        let expected = field.value.kind();
        if expected != value.kind() {
            return Err(FieldError::TypeMismatch {
                path: path.to_string(),
                expected,
                found: value.kind(),
            });
        }

        match (&mut field.value, value) {
            // Variant names belong to the field, only the index is written
            (FieldValue::Enum { index, variants }, FieldValue::Enum { index: new_index, .. }) => {
                if new_index >= variants.len() {
                    return Err(FieldError::EnumOutOfRange {
                        path: path.to_string(),
                        index: new_index,
                        count: variants.len(),
                    });
                }
                *index = new_index;
            }
            (slot, value) => *slot = value,
        }

        self.dirty.insert(object.to_string());
        Ok(())
    }

    fn is_dirty(&self, object: &str) -> bool {
        self.dirty.contains(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn quality() -> FieldValue {
        FieldValue::Enum {
            index: 0,
            variants: vec!["Low".to_string(), "Medium".to_string(), "High".to_string()],
        }
    }

    fn test_scene() -> SceneStore {
        SceneStore::new().with_object(
            SceneObject::new("Light")
                .with_field("label", FieldValue::Text("key light".to_string()))
                .with_field("intensity", FieldValue::Float(2.0))
                .with_field("count", FieldValue::Integer(3))
                .with_field("enabled", FieldValue::Boolean(true))
                .with_field("quality", quality()),
        )
    }

    #[test]
    fn test_list_numeric_fields_filters_text() {
        let scene = test_scene();
        let all = scene.list_fields("Light").unwrap();
        assert_eq!(all.len(), 5);

        let numeric = scene.list_numeric_fields("Light").unwrap();
        let paths: Vec<_> = numeric.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["intensity", "count", "enabled", "quality"]);
    }

    #[test]
    fn test_unknown_object_and_field() {
        let scene = test_scene();
        assert_eq!(
            scene.list_fields("Camera"),
            Err(FieldError::UnknownObject("Camera".to_string()))
        );
        assert!(matches!(
            scene.read_field("Light", "missing"),
            Err(FieldError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_write_marks_dirty() {
        let mut scene = test_scene();
        assert!(!scene.is_dirty("Light"));

        scene.write_field("Light", "intensity", FieldValue::Float(4.5)).unwrap();
        assert!(scene.is_dirty("Light"));
        assert_eq!(scene.read_field("Light", "intensity").unwrap(), FieldValue::Float(4.5));
        assert_eq!(scene.dirty_objects(), vec!["Light"]);

        scene.clear_dirty();
        assert!(!scene.is_dirty("Light"));
    }

    #[test]
    fn test_write_type_mismatch() {
        let mut scene = test_scene();
        let result = scene.write_field("Light", "intensity", FieldValue::Integer(4));
        assert!(matches!(result, Err(FieldError::TypeMismatch { .. })));
        assert!(!scene.is_dirty("Light"));
    }

    #[test]
    fn test_write_enum_keeps_variants() {
        let mut scene = test_scene();
        scene
            .write_field(
                "Light",
                "quality",
                FieldValue::Enum {
                    index: 2,
                    variants: Vec::new(),
                },
            )
            .unwrap();

        match scene.read_field("Light", "quality").unwrap() {
            FieldValue::Enum { index, variants } => {
                assert_eq!(index, 2);
                assert_eq!(variants.len(), 3);
            }
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn test_write_enum_out_of_range() {
        let mut scene = test_scene();
        let result = scene.write_field(
            "Light",
            "quality",
            FieldValue::Enum {
                index: 3,
                variants: Vec::new(),
            },
        );
        assert!(matches!(result, Err(FieldError::EnumOutOfRange { count: 3, .. })));
    }

    #[test]
    fn test_validate_duplicates() {
        let scene = SceneStore::new()
            .with_object(SceneObject::new("A"))
            .with_object(SceneObject::new("A"));
        assert!(scene.validate().is_err());

        let scene = SceneStore::new().with_object(
            SceneObject::new("A")
                .with_field("x", FieldValue::Float(0.0))
                .with_field("x", FieldValue::Float(1.0)),
        );
        assert!(scene.validate().is_err());
    }

    #[test]
    fn test_load_yaml_scene() {
        let yaml = r#"
objects:
  - name: Light
    fields:
      - path: intensity
        value: 2.0
      - path: mode
        value:
          index: 1
          variants: [Spot, Point]
"#;
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        std::fs::write(file.path(), yaml).unwrap();

        let scene = SceneStore::load(file.path()).unwrap();
        assert_eq!(scene.objects().len(), 1);
        assert_eq!(scene.read_field("Light", "intensity").unwrap(), FieldValue::Float(2.0));
    }

    #[test]
    fn test_save_and_reload_json() {
        let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let mut scene = test_scene();
        scene.write_field("Light", "count", FieldValue::Integer(7)).unwrap();
        scene.save(file.path()).unwrap();
        assert!(scene.dirty_objects().is_empty());

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.trim_start().starts_with('{'));

        let reloaded = SceneStore::load(file.path()).unwrap();
        assert_eq!(reloaded.read_field("Light", "count").unwrap(), FieldValue::Integer(7));
        assert_eq!(reloaded.read_field("Light", "quality").unwrap(), quality());
    }

    #[test]
    fn test_load_invalid_scene() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "objects: [ { name: A }, { name: A } ]").unwrap();
        assert!(SceneStore::load(file.path()).is_err());
    }
}

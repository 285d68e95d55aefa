//! Per-tick sampling of controls into bound fields

use crate::bindings::InputRegistry;
use crate::controls::ControlInput;
use crate::fields::FieldStore;

use super::SampleHistory;

/// What one sampling pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Controls read from the input
    pub sampled: usize,
    /// Bindings whose field was written
    pub applied: usize,
    /// Bindings skipped (no target, no field, or an incompatible field)
    pub skipped: usize,
}

/// Run one sampling pass.
///
/// Every control is read once. The movement since the previous reading is
/// scaled by each binding's scale factor and added to its value, which is then
/// written to the bound field. Controls without bindings only update history.
pub fn sample(
    registry: &mut InputRegistry,
    history: &mut SampleHistory,
    input: &dyn ControlInput,
    store: &mut dyn FieldStore,
) -> TickReport {
    let mut report = TickReport::default();

    for slot in registry.slots_mut() {
        let channel = slot.channel().hardware_channel();
        let reading = input.read_channel(channel);
        let delta = history.record(channel, reading);
        report.sampled += 1;

        for binding in slot.bindings_mut() {
            binding.accumulate(delta);
            match binding.apply(store) {
                Ok(()) => report.applied += 1,
                Err(e) => {
                    log::debug!("Skipping binding {}: {}", binding.id(), e);
                    report.skipped += 1;
                }
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::{ControlChannel, ManualInput};
    use crate::fields::{FieldValue, SceneObject, SceneStore};

    fn scene() -> SceneStore {
        SceneStore::new().with_object(
            SceneObject::new("Light")
                .with_field("intensity", FieldValue::Float(0.0))
                .with_field("range", FieldValue::Float(0.0)),
        )
    }

    fn bind(
        registry: &mut InputRegistry,
        store: &SceneStore,
        channel: ControlChannel,
        path: &str,
        scale: i32,
    ) {
        let id = registry.create_binding(channel);
        let binding = registry.binding_mut(id).unwrap();
        binding.rebind_target(Some("Light"), store).unwrap();
        binding.select_field_path(path).unwrap();
        binding.set_scale(scale);
    }

    fn float(store: &SceneStore, path: &str) -> f64 {
        match store.read_field("Light", path).unwrap() {
            FieldValue::Float(x) => x,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_no_bindings_no_writes() {
        let mut registry = InputRegistry::new();
        let mut history = SampleHistory::new();
        let mut store = scene();
        let input = ManualInput::new();
        input.set(16, 0.7);

        let report = sample(&mut registry, &mut history, &input, &mut store);
        assert_eq!(report.sampled, 16);
        assert_eq!(report.applied, 0);
        assert!(store.dirty_objects().is_empty());
        // still sampled
        assert_eq!(history.previous(16), 0.7);
    }

    #[test]
    fn test_delta_law() {
        let mut registry = InputRegistry::new();
        let mut history = SampleHistory::new();
        let mut store = scene();
        let knob = ControlChannel::knob(0).unwrap();
        bind(&mut registry, &store, knob, "intensity", 4);

        let input = ManualInput::new();
        input.set(16, 0.25);
        sample(&mut registry, &mut history, &input, &mut store);
        let before = float(&store, "intensity");

        input.set(16, 0.75);
        sample(&mut registry, &mut history, &input, &mut store);
        assert!((float(&store, "intensity") - before - 4.0 * 0.5).abs() < 1e-9);

        // no movement, no change
        let before = float(&store, "intensity");
        sample(&mut registry, &mut history, &input, &mut store);
        assert_eq!(float(&store, "intensity"), before);
    }

    #[test]
    fn test_first_sample_measures_from_zero() {
        let mut registry = InputRegistry::new();
        let mut history = SampleHistory::new();
        let mut store = scene();
        bind(&mut registry, &store, ControlChannel::slider(2).unwrap(), "intensity", 3);

        let input = ManualInput::new();
        input.set(2, 0.5);
        sample(&mut registry, &mut history, &input, &mut store);
        assert!((float(&store, "intensity") - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_bindings_on_one_control_use_own_scale() {
        let mut registry = InputRegistry::new();
        let mut history = SampleHistory::new();
        let mut store = scene();
        let knob = ControlChannel::knob(1).unwrap();
        bind(&mut registry, &store, knob, "intensity", 1);
        bind(&mut registry, &store, knob, "range", 10);

        let input = ManualInput::new();
        input.set(17, 0.5);
        let report = sample(&mut registry, &mut history, &input, &mut store);
        assert_eq!(report.applied, 2);
        assert!((float(&store, "intensity") - 0.5).abs() < 1e-9);
        assert!((float(&store, "range") - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_unbound_binding_is_skipped() {
        let mut registry = InputRegistry::new();
        let mut history = SampleHistory::new();
        let mut store = scene();
        let knob = ControlChannel::knob(0).unwrap();
        let id = registry.create_binding(knob);

        let input = ManualInput::new();
        input.set(16, 0.5);
        let report = sample(&mut registry, &mut history, &input, &mut store);
        assert_eq!(report.skipped, 1);
        assert!(store.dirty_objects().is_empty());
        // value still tracks the control
        assert_eq!(registry.binding(id).unwrap().value(), 0.5);
    }

    #[test]
    fn test_scale_change_only_affects_later_movement() {
        let mut registry = InputRegistry::new();
        let mut history = SampleHistory::new();
        let mut store = scene();
        let knob = ControlChannel::knob(0).unwrap();
        bind(&mut registry, &store, knob, "intensity", 2);
        let id = registry.bindings(knob)[0].id();

        let input = ManualInput::new();
        input.set(16, 0.5);
        sample(&mut registry, &mut history, &input, &mut store);
        assert!((float(&store, "intensity") - 1.0).abs() < 1e-9);

        registry.binding_mut(id).unwrap().set_scale(10);
        sample(&mut registry, &mut history, &input, &mut store);
        assert!((float(&store, "intensity") - 1.0).abs() < 1e-9);

        input.set(16, 0.6);
        sample(&mut registry, &mut history, &input, &mut store);
        assert!((float(&store, "intensity") - 2.0).abs() < 1e-9);
    }
}

//! Controller inputs
//!
//! The physical knobs and sliders, and the sources their readings come from.

mod channel;
mod input;
mod midi;

pub use channel::{ControlChannel, ControlKind, CONTROLS_PER_KIND};
pub use input::{ControlInput, ManualInput};
pub use midi::{decode_control_change, list_input_ports, ControlTable, MidiControlInput};

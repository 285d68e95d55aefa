//! knobwire - Drive scene fields live from MIDI controller knobs and sliders
//!
//! Each of the 8 knobs and 8 sliders can own bindings to numeric fields of
//! named scene objects. While live, control movements are accumulated into
//! the bindings and written to the fields every tick; when live mode ends the
//! final values are written back so they can be persisted.

pub mod bindings;
pub mod config;
pub mod controls;
pub mod fields;
pub mod session;
pub mod viz;

pub use config::KnobwireConfig;
pub use session::{LiveSession, Session};

//! MIDI control input for knobwire.
//!
//! Listens on a MIDI input port and keeps the latest Control Change value
//! of every controller number, normalized to 0.0-1.0.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use midir::{Ignore, MidiInput, MidiInputConnection};

use super::ControlInput;

/// Number of MIDI controller numbers
const CONTROLLER_COUNT: usize = 128;

/// Latest value per controller number, shared with the MIDI callback
#[derive(Debug, Clone)]
pub struct ControlTable {
    values: [f64; CONTROLLER_COUNT],
}

impl Default for ControlTable {
    fn default() -> Self {
        Self {
            values: [0.0; CONTROLLER_COUNT],
        }
    }
}

impl ControlTable {
    pub fn get(&self, controller: u8) -> f64 {
        self.values
            .get(controller as usize)
            .copied()
            .unwrap_or(0.0)
    }

    /// Apply a raw MIDI message. Returns true if it was a Control Change.
    pub fn apply(&mut self, message: &[u8]) -> bool {
        match decode_control_change(message) {
            Some((controller, value)) => {
                self.values[controller as usize] = value as f64 / 127.0;
                true
            }
            None => false,
        }
    }
}

/// Decode a Control Change message on any MIDI channel into
/// (controller number, 7-bit value).
pub fn decode_control_change(message: &[u8]) -> Option<(u8, u8)> {
    if message.len() < 3 || message[0] & 0xF0 != 0xB0 {
        return None;
    }
    Some((message[1] & 0x7F, message[2] & 0x7F))
}

/// Control input fed by a live MIDI port.
pub struct MidiControlInput {
    table: Arc<Mutex<ControlTable>>,
    port_name: String,
    // Dropping the connection closes the port
    _connection: MidiInputConnection<()>,
}

impl MidiControlInput {
    /// Connect to the first input port whose name contains `port_name`,
    /// or the first available port when `None`.
    pub fn connect(client_name: &str, port_name: Option<&str>) -> Result<Self> {
        let mut midi_in = MidiInput::new(client_name)?;
        midi_in.ignore(Ignore::All);
        let ports = midi_in.ports();

        if ports.is_empty() {
            return Err(anyhow!("No MIDI input ports available"));
        }

        let port = if let Some(name) = port_name {
            ports
                .iter()
                .find(|p| {
                    midi_in
                        .port_name(p)
                        .map(|n| n.contains(name))
                        .unwrap_or(false)
                })
                .ok_or_else(|| anyhow!("MIDI port '{}' not found", name))?
                .clone()
        } else {
            ports[0].clone()
        };

        let port_name_actual = midi_in.port_name(&port)?;
        let table = Arc::new(Mutex::new(ControlTable::default()));
        let callback_table = Arc::clone(&table);

        let connection = midi_in
            .connect(
                &port,
                "knobwire-input",
                move |_timestamp, message, _| {
                    let mut table = callback_table.lock().unwrap_or_else(|e| e.into_inner());
                    if table.apply(message) {
                        log::trace!("MIDI CC {:02X?}", message);
                    }
                },
                (),
            )
            .map_err(|e| anyhow!("Failed to connect MIDI input: {}", e))?;

        log::info!("MIDI input connected to: {}", port_name_actual);

        Ok(Self {
            table,
            port_name: port_name_actual,
            _connection: connection,
        })
    }

    /// Name of the connected port
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

impl ControlInput for MidiControlInput {
    fn read_channel(&self, channel: u8) -> f64 {
        read_shared(&self.table, channel)
    }
}

/// Read a controller from the shared table. A poisoned lock still holds the
/// last values written, so those are returned rather than 0.
fn read_shared(table: &Mutex<ControlTable>, channel: u8) -> f64 {
    match table.lock() {
        Ok(table) => table.get(channel),
        Err(poisoned) => {
            log::warn!("MIDI control table lock poisoned, reading last values");
            poisoned.into_inner().get(channel)
        }
    }
}

/// List available MIDI input ports.
pub fn list_input_ports() -> Result<Vec<String>> {
    let midi_in = MidiInput::new("knobwire MIDI List")?;
    let ports = midi_in.ports();

    let names: Vec<String> = ports
        .iter()
        .filter_map(|p| midi_in.port_name(p).ok())
        .collect();

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_control_change() {
        assert_eq!(decode_control_change(&[0xB0, 16, 64]), Some((16, 64)));
        // channel bits are ignored
        assert_eq!(decode_control_change(&[0xB5, 3, 127]), Some((3, 127)));
    }

    #[test]
    fn test_decode_ignores_other_messages() {
        assert_eq!(decode_control_change(&[0x90, 60, 100]), None);
        assert_eq!(decode_control_change(&[0xB0, 16]), None);
        assert_eq!(decode_control_change(&[]), None);
    }

    #[test]
    fn test_control_table_normalizes() {
        let mut table = ControlTable::default();
        assert_eq!(table.get(16), 0.0);

        assert!(table.apply(&[0xB0, 16, 127]));
        assert_eq!(table.get(16), 1.0);

        assert!(table.apply(&[0xB0, 0, 0]));
        assert_eq!(table.get(0), 0.0);

        assert!(!table.apply(&[0x80, 16, 0]));
        assert_eq!(table.get(16), 1.0);
    }

    #[test]
    fn test_poisoned_table_keeps_last_values() {
        let table = Arc::new(Mutex::new(ControlTable::default()));
        table.lock().unwrap().apply(&[0xB0, 16, 127]);

        let poisoner = Arc::clone(&table);
        let result = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("callback failed");
        })
        .join();
        assert!(result.is_err());
        assert!(table.is_poisoned());

        assert_eq!(read_shared(&table, 16), 1.0);
    }

    #[test]
    fn test_control_table_out_of_range_reads_zero() {
        let table = ControlTable::default();
        assert_eq!(table.get(200), 0.0);
    }
}

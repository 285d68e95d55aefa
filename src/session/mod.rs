//! Session state and live mode
//!
//! A [`Session`] owns the control registry, the sample history and the
//! display preference. Entering live mode hands out a [`LiveSession`] guard;
//! leaving it (explicitly or by drop) pushes binding values into the scene.

mod history;
mod live;
mod sampler;

pub use history::SampleHistory;
pub use live::LiveSession;
pub use sampler::{sample, TickReport};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::bindings::{BindingError, BindingId, InputRegistry};
use crate::config::{BindingConfig, KnobwireConfig, LiveConfig, Theme};
use crate::controls::{ControlChannel, ControlInput};
use crate::fields::FieldStore;

/// Whether controls are currently driving fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Live,
}

/// Errors from session commands
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("session is already live")]
    AlreadyLive,

    #[error("no binding {0}")]
    UnknownBinding(BindingId),

    #[error(transparent)]
    Binding(#[from] BindingError),
}

/// Everything a mapping session owns
#[derive(Debug, Clone)]
pub struct Session {
    registry: InputRegistry,
    history: SampleHistory,
    mode: Mode,
    options: LiveConfig,
    theme: Theme,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(LiveConfig::default())
    }
}

impl Session {
    pub fn new(options: LiveConfig) -> Self {
        Self {
            registry: InputRegistry::new(),
            history: SampleHistory::new(),
            mode: Mode::Idle,
            options,
            theme: Theme::default(),
        }
    }

    /// Build a session from configuration, resolving binding targets in `store`
    pub fn from_config(config: &KnobwireConfig, store: &dyn FieldStore) -> Result<Self> {
        let mut session = Session::new(config.live.clone());
        session.theme = config.display.theme;

        for entry in &config.bindings {
            let id = session.registry.push_binding(entry.control);
            let binding = session
                .registry
                .binding_mut(id)
                .ok_or(SessionError::UnknownBinding(id))?;

            binding.set_scale(entry.scale);
            binding.set_value(entry.value);
            if let Some(object) = &entry.object {
                binding
                    .rebind_target(Some(object.as_str()), store)
                    .with_context(|| format!("Binding on {}", entry.control))?;
            }
            if let Some(field) = &entry.field {
                binding
                    .select_field_path(field)
                    .with_context(|| format!("Binding on {} to '{}'", entry.control, field))?;
            }
        }

        Ok(session)
    }

    /// Current bindings in persisted form
    pub fn binding_configs(&self) -> Vec<BindingConfig> {
        self.registry
            .iter()
            .map(|(control, binding)| BindingConfig {
                control,
                object: binding.target().map(str::to_string),
                field: binding.field_path().map(str::to_string),
                scale: binding.scale(),
                value: binding.value(),
            })
            .collect()
    }

    pub fn registry(&self) -> &InputRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut InputRegistry {
        &mut self.registry
    }

    pub fn history(&self) -> &SampleHistory {
        &self.history
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_live(&self) -> bool {
        self.mode == Mode::Live
    }

    pub fn options(&self) -> &LiveConfig {
        &self.options
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Flip the controller color preference
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn create_binding(&mut self, channel: ControlChannel) -> BindingId {
        self.registry.create_binding(channel)
    }

    pub fn remove_binding(&mut self, channel: ControlChannel, id: BindingId) -> bool {
        self.registry.remove_binding(channel, id)
    }

    pub fn clear_all(&mut self) {
        self.registry.clear_all();
    }

    /// Point a binding at another object, dropping its field selection
    pub fn rebind_target(
        &mut self,
        id: BindingId,
        target: Option<&str>,
        store: &dyn FieldStore,
    ) -> Result<(), SessionError> {
        let binding = self
            .registry
            .binding_mut(id)
            .ok_or(SessionError::UnknownBinding(id))?;
        binding.rebind_target(target, store)?;
        Ok(())
    }

    /// Select the field a binding drives
    pub fn select_field(&mut self, id: BindingId, path: &str) -> Result<(), SessionError> {
        let binding = self
            .registry
            .binding_mut(id)
            .ok_or(SessionError::UnknownBinding(id))?;
        binding.select_field_path(path)?;
        Ok(())
    }

    /// Enter live mode.
    ///
    /// Runs one tick immediately. The returned guard leaves live mode when
    /// finished or dropped.
    pub fn enter_live<'a, S: FieldStore>(
        &'a mut self,
        input: &'a dyn ControlInput,
        store: &'a mut S,
    ) -> Result<LiveSession<'a, S>, SessionError> {
        if self.is_live() {
            return Err(SessionError::AlreadyLive);
        }
        Ok(LiveSession::start(self, input, store))
    }
}

//! Live mode: the scoped period in which controls drive fields

use crate::controls::{ControlChannel, ControlInput};
use crate::fields::FieldStore;

use super::{sample, Mode, Session, TickReport};

/// A running live session.
///
/// Created by [`Session::enter_live`]. While it exists the session samples
/// controls on every [`tick`](LiveSession::tick). Leaving live mode, through
/// [`finish`](LiveSession::finish) or by dropping the guard, writes every
/// binding's last value into its field one final time.
pub struct LiveSession<'a, S: FieldStore> {
    session: &'a mut Session,
    input: &'a dyn ControlInput,
    store: &'a mut S,
    ticks: u64,
    finished: bool,
}

impl<'a, S: FieldStore> LiveSession<'a, S> {
    pub(super) fn start(session: &'a mut Session, input: &'a dyn ControlInput, store: &'a mut S) -> Self {
        session.mode = Mode::Live;

        if session.options.restore_on_enter {
            for binding in session.registry.iter_mut() {
                if let Err(e) = binding.restore(&*store) {
                    log::debug!("Not restoring binding {}: {}", binding.id(), e);
                }
            }
        }

        if session.options.seed_history_on_enter {
            for channel in ControlChannel::all() {
                let hardware = channel.hardware_channel();
                session.history.record(hardware, input.read_channel(hardware));
            }
        }

        log::info!(
            "Entered live mode with {} binding(s)",
            session.registry.binding_count()
        );

        let mut live = Self {
            session,
            input,
            store,
            ticks: 0,
            finished: false,
        };
        // Fields reflect the controls from the very first frame
        live.tick();
        live
    }

    /// Run one sampling pass
    pub fn tick(&mut self) -> TickReport {
        let report = sample(
            &mut self.session.registry,
            &mut self.session.history,
            self.input,
            &mut *self.store,
        );
        self.ticks += 1;
        log::trace!("Tick {}: {:?}", self.ticks, report);
        report
    }

    /// Ticks run so far, including the one on entry
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn session(&self) -> &Session {
        &*self.session
    }

    /// Lifecycle commands (create, remove, clear) between ticks
    pub fn session_mut(&mut self) -> &mut Session {
        &mut *self.session
    }

    pub fn store(&self) -> &S {
        &*self.store
    }

    pub fn input(&self) -> &dyn ControlInput {
        self.input
    }

    /// Leave live mode. Returns the number of fields written on the way out.
    pub fn finish(mut self) -> usize {
        self.exit()
    }

    fn exit(&mut self) -> usize {
        if self.finished {
            return 0;
        }
        self.finished = true;
        self.session.mode = Mode::Idle;

        let mut written = 0;
        for binding in self.session.registry.iter_mut() {
            match binding.apply(&mut *self.store) {
                Ok(()) => written += 1,
                Err(e) => log::debug!("Not persisting binding {}: {}", binding.id(), e),
            }
        }

        log::info!(
            "Left live mode after {} tick(s), {} field(s) written",
            self.ticks,
            written
        );
        written
    }
}

impl<S: FieldStore> Drop for LiveSession<'_, S> {
    fn drop(&mut self) {
        self.exit();
    }
}

use crate::error::Result;
use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::{self, SigId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Raw mode disables signals from the keyboard, so these only come from other processes. Instead
// of being killed with the terminal left in raw mode, the editor polls this flag and quits normally.
const TERMINATION_SIGNALS: &[i32] = &[SIGTERM, SIGINT, SIGHUP, SIGQUIT];

pub struct TerminationWatcher {
    flag: Arc<AtomicBool>,
    signal_ids: Vec<SigId>,
}

impl TerminationWatcher {
    pub fn new() -> Result<Self> {
        let mut watcher = Self {
            flag: Arc::new(AtomicBool::new(false)),
            signal_ids: Vec::with_capacity(TERMINATION_SIGNALS.len()),
        };
        // Handlers registered so far are unregistered on drop even if a later one fails
        for sig in TERMINATION_SIGNALS {
            let id = signal_hook::flag::register(*sig, Arc::clone(&watcher.flag))?;
            watcher.signal_ids.push(id);
        }
        Ok(watcher)
    }

    pub fn notified(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

impl Drop for TerminationWatcher {
    fn drop(&mut self) {
        for id in self.signal_ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}

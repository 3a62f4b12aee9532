//! Unix signal operations

use crate::error::{Error, Result};
use crate::platform::traits::{GroupSignal, SignalOps};
use nix::sys::signal::{killpg, Signal as NixSignal};
use nix::unistd::{getpgid, Pid};

pub struct UnixSignals;

impl UnixSignals {
    pub fn new() -> Self {
        Self
    }
}

fn to_nix(signal: GroupSignal) -> NixSignal {
    match signal {
        GroupSignal::Interrupt => NixSignal::SIGINT,
        GroupSignal::Terminate => NixSignal::SIGTERM,
        GroupSignal::Kill => NixSignal::SIGKILL,
    }
}

impl SignalOps for UnixSignals {
    fn signal_group(&self, pgid: i32, signal: GroupSignal) -> Result<()> {
        if pgid <= 1 {
            return Err(Error::SignalSendFailed {
                signal: signal.name().to_string(),
                reason: format!("refusing to signal process group {}", pgid),
            });
        }
        killpg(Pid::from_raw(pgid), to_nix(signal)).map_err(|e| Error::SignalSendFailed {
            signal: signal.name().to_string(),
            reason: e.to_string(),
        })
    }

    fn process_group_of(&self, pid: u32) -> Result<i32> {
        Ok(getpgid(Some(Pid::from_raw(pid as i32)))?.as_raw())
    }

    fn is_group_alive(&self, pgid: i32) -> bool {
        // Signal 0 performs the permission/existence check only
        pgid > 1 && killpg(Pid::from_raw(pgid), None::<NixSignal>).is_ok()
    }
}

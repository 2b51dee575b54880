//! Process-wide feedback tone output.

use std::{
    io::{self, Write},
    sync::OnceLock,
};

use anyhow::Result;
use crossterm::tty::IsTty;
use gene_link_rendering::ToneCue;

const BELL: &[u8] = b"\x07";

/// Terminal bell shared by the whole process.
#[derive(Debug)]
pub(crate) struct Bell {
    audible: bool,
}

/// Returns the process bell, probing the terminal on first use.
pub(crate) fn bell() -> &'static Bell {
    static DEVICE: OnceLock<Bell> = OnceLock::new();
    DEVICE.get_or_init(|| {
        let audible = io::stderr().is_tty();
        log::debug!(
            "terminal bell {}",
            if audible { "enabled" } else { "unavailable" }
        );
        Bell { audible }
    })
}

impl Bell {
    /// Rings the bell for a tone cue.
    ///
    /// A terminal cannot reproduce pitch or waveform, so every cue becomes a
    /// single bell character.
    pub(crate) fn ring(&self, cue: ToneCue) -> Result<()> {
        log::trace!(
            "tone {} Hz {:?} for {:?}",
            cue.frequency_hz,
            cue.waveform,
            cue.duration
        );
        if !self.audible {
            return Ok(());
        }
        let mut stderr = io::stderr().lock();
        stderr.write_all(BELL)?;
        stderr.flush()?;
        Ok(())
    }
}

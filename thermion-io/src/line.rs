//! Resumable non-blocking line reader
//!
//! Assembles a terminator-delimited record across repeated calls, so the
//! command layer can poll for complete lines without ever blocking the
//! system. The reader consumes one byte at a time ([`LineReader::feed`])
//! and keeps only its own progress; the destination buffer belongs to the
//! caller and must be the same one across calls for a given line.

/// ASCII line feed - the canonical newline
pub(crate) const LF: u8 = 0x0A;
/// ASCII carriage return
pub(crate) const CR: u8 = 0x0D;
/// ASCII NUL - terminates the assembled record, never part of one
pub(crate) const NUL: u8 = 0x00;

/// End-of-line policy, fixed per transport
///
/// The SPI wire protocol forbids CR as a record separator (a CR there is
/// ordinary payload), while UART consoles send either. This stays a
/// per-transport setting; do not unify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Terminator {
    /// CR or LF ends the line (UART line mode)
    CrOrLf,
    /// Only LF ends the line (SPI slave channel)
    LfOnly,
}

impl Terminator {
    fn matches(&self, byte: u8) -> bool {
        match self {
            Terminator::CrOrLf => byte == CR || byte == LF,
            Terminator::LfOnly => byte == LF,
        }
    }
}

/// Result of a `gets` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineStatus {
    /// A full line is in the destination (NUL-terminated, terminator
    /// excluded); the payload length is carried here
    Complete(usize),
    /// No terminator yet - call again when more input may have arrived
    Again,
    /// Destination capacity exceeded; the buffer holds a NUL-terminated
    /// prefix and the partial line was discarded as a record
    Overflow,
}

/// Outcome of feeding a single byte to the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FeedResult {
    /// Byte consumed, line still in progress
    Pending,
    /// Terminator seen; destination NUL-terminated, state reset
    Complete(usize),
    /// Destination full; truncated, NUL-terminated, state reset
    Overflow,
}

/// Line assembly state, one per device
///
/// Binds implicitly on the first byte of a new line and persists across
/// calls until a terminator or overflow, then resets to idle.
#[derive(Debug)]
pub struct LineReader {
    terminator: Terminator,
    in_line: bool,
    len: usize,
}

impl LineReader {
    pub const fn new(terminator: Terminator) -> Self {
        Self {
            terminator,
            in_line: false,
            len: 0,
        }
    }

    /// Drop any partially assembled line (device re-open)
    pub fn reset(&mut self) {
        self.in_line = false;
        self.len = 0;
    }

    /// Consume one byte from the device into `dest`.
    ///
    /// The terminator is not copied into `dest`; the record is always
    /// NUL-terminated, and the stored prefix never exceeds
    /// `dest.len() - 1` bytes.
    pub(crate) fn feed(&mut self, byte: u8, dest: &mut [u8]) -> FeedResult {
        if !self.in_line {
            self.in_line = true;
            self.len = 0;
        }

        if self.terminator.matches(byte) {
            if let Some(slot) = dest.get_mut(self.len) {
                *slot = NUL;
            }
            let len = self.len;
            self.reset();
            return FeedResult::Complete(len);
        }

        // Keep one slot for the NUL
        if self.len + 1 >= dest.len() {
            if let Some(slot) = dest.get_mut(self.len) {
                *slot = NUL;
            }
            self.reset();
            return FeedResult::Overflow;
        }

        dest[self.len] = byte;
        self.len += 1;
        FeedResult::Pending
    }
}

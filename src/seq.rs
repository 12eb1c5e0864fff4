//!
//! Reusable sequence buffers for emission
//!
//! A `Seq` is either digital (residue codes in `0..=K`) or text
//! (human-readable symbol bytes). Samplers require digital buffers, the
//! fancy consensus generator requires a text buffer; handing in the wrong
//! mode is a caller error.
//!
//! Buffers are reused across calls: each emission call starts with
//! `reuse()` and refills the buffer, so repeated sampling into the same
//! `Seq` never leaks previous contents.
//!
use crate::alphabet::{Alphabet, Residue, SENTINEL};
use crate::error::EmitError;

///
/// Representation mode of a `Seq` buffer.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqMode {
    /// residue codes `0..=K`
    Digital,
    /// printable symbol bytes
    Text,
}

///
/// Growable, reusable sequence buffer.
///
#[derive(Debug, Clone)]
pub struct Seq {
    mode: SeqMode,
    buf: Vec<u8>,
}

impl Seq {
    ///
    /// Empty digital-mode buffer
    ///
    pub fn digital() -> Seq {
        Seq {
            mode: SeqMode::Digital,
            buf: Vec::new(),
        }
    }
    ///
    /// Empty text-mode buffer
    ///
    pub fn text() -> Seq {
        Seq {
            mode: SeqMode::Text,
            buf: Vec::new(),
        }
    }
    pub fn mode(&self) -> SeqMode {
        self.mode
    }
    pub fn is_digital(&self) -> bool {
        self.mode == SeqMode::Digital
    }
    pub fn is_text(&self) -> bool {
        self.mode == SeqMode::Text
    }
    ///
    /// Reset the buffer for a fresh emission call.
    /// Keeps the allocation, drops the contents.
    ///
    pub fn reuse(&mut self) {
        self.buf.clear();
    }
    ///
    /// Pre-reserve room for `n` entries.
    ///
    pub fn grow_to(&mut self, n: usize) -> Result<(), EmitError> {
        let additional = n.saturating_sub(self.buf.len());
        self.buf.try_reserve(additional)?;
        Ok(())
    }
    ///
    /// Append one digital residue code.
    ///
    pub fn push_residue(&mut self, x: Residue) -> Result<(), EmitError> {
        if !self.is_digital() {
            return Err(EmitError::Precondition(
                "push_residue requires a digital-mode Seq",
            ));
        }
        self.buf.try_reserve(1)?;
        self.buf.push(x);
        Ok(())
    }
    ///
    /// Append one text symbol byte.
    ///
    pub fn push_char(&mut self, c: u8) -> Result<(), EmitError> {
        if !self.is_text() {
            return Err(EmitError::Precondition(
                "push_char requires a text-mode Seq",
            ));
        }
        self.buf.try_reserve(1)?;
        self.buf.push(c);
        Ok(())
    }
    ///
    /// Append the end-of-sequence marker (digital sentinel or NUL).
    ///
    pub fn terminate(&mut self) -> Result<(), EmitError> {
        self.buf.try_reserve(1)?;
        match self.mode {
            SeqMode::Digital => self.buf.push(SENTINEL),
            SeqMode::Text => self.buf.push(0),
        }
        Ok(())
    }
    ///
    /// Number of residues/symbols, excluding the terminator.
    ///
    pub fn len(&self) -> usize {
        self.contents().len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    ///
    /// Digital residue codes, excluding the terminator.
    ///
    pub fn residues(&self) -> &[Residue] {
        self.contents()
    }
    ///
    /// Text contents as `&str` (text mode; terminator excluded).
    ///
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(self.contents()).unwrap_or("")
    }
    ///
    /// Render a digital buffer as text with the given alphabet.
    ///
    pub fn to_text(&self, abc: &Alphabet) -> String {
        abc.to_text(self.contents())
    }

    fn contents(&self) -> &[u8] {
        let terminator = match self.mode {
            SeqMode::Digital => SENTINEL,
            SeqMode::Text => 0,
        };
        match self.buf.last() {
            Some(&b) if b == terminator => &self.buf[..self.buf.len() - 1],
            _ => &self.buf,
        }
    }
}

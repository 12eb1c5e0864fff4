//!
//! Digital residue alphabets
//!
//! A residue is a `u8` code in `0..K`. The code `K` is reserved for the
//! degenerate/unknown residue (`N` for DNA, `X` for protein).
//!

///
/// Digital residue code.
///
pub type Residue = u8;

///
/// End-of-sequence sentinel appended to digital sequence buffers.
///
pub const SENTINEL: Residue = u8::MAX;

///
/// Residue alphabet of size K with a designated unknown symbol.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: &'static [u8],
    unknown: u8,
}

impl Alphabet {
    ///
    /// 4-letter DNA alphabet `ACGT`, unknown = `N`
    ///
    pub fn dna() -> Alphabet {
        Alphabet {
            symbols: b"ACGT",
            unknown: b'N',
        }
    }
    ///
    /// 20-letter amino acid alphabet, unknown = `X`
    ///
    pub fn amino() -> Alphabet {
        Alphabet {
            symbols: b"ACDEFGHIKLMNPQRSTVWY",
            unknown: b'X',
        }
    }
    ///
    /// Alphabet size K
    ///
    pub fn k(&self) -> usize {
        self.symbols.len()
    }
    ///
    /// Digital code of the degenerate/unknown residue (= K)
    ///
    pub fn unknown_code(&self) -> Residue {
        self.symbols.len() as Residue
    }
    ///
    /// Text symbol of the degenerate/unknown residue
    ///
    pub fn unknown_symbol(&self) -> u8 {
        self.unknown
    }
    ///
    /// Canonical symbols in code order
    ///
    pub fn symbols(&self) -> &[u8] {
        self.symbols
    }
    ///
    /// Text symbol for a digital residue code.
    /// Codes at or beyond K render as the unknown symbol.
    ///
    pub fn symbol(&self, x: Residue) -> u8 {
        if (x as usize) < self.symbols.len() {
            self.symbols[x as usize]
        } else {
            self.unknown
        }
    }
    ///
    /// Render a digital residue slice as a text `String`
    ///
    pub fn to_text(&self, residues: &[Residue]) -> String {
        residues.iter().map(|&x| self.symbol(x) as char).collect()
    }
}

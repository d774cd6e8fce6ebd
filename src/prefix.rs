/*
MIT License

Copyright (c) 2026 Raja Lehtihet and Wael El Oraiby

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! SI-prefix configuration passed explicitly into the parser.
//!
//! The table is an ordered list of `{symbol, factor}` entries; there is no
//! global prefix state. Literals scale by the matched factor at parse time,
//! and the solver divides by the same factor when patching solved values back
//! into the source text.

/// Single SI-prefix entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SiPrefix {
    /// Prefix symbol as written in source (`"k"`, `"%"`, ...). Empty for the
    /// default prefix.
    pub symbol: String,
    /// Power-of-ten multiplier applied to the literal value.
    pub factor: f64,
}

impl SiPrefix {
    /// Creates a prefix entry.
    pub fn new(symbol: impl Into<String>, factor: f64) -> Self {
        Self {
            symbol: symbol.into(),
            factor,
        }
    }

    /// Returns the empty prefix (factor 1).
    pub fn none() -> Self {
        Self::new("", 1.0)
    }

    /// Returns `true` for the empty prefix.
    pub fn is_none(&self) -> bool {
        self.symbol.is_empty()
    }
}

impl Default for SiPrefix {
    fn default() -> Self {
        Self::none()
    }
}

/// Ordered SI-prefix table consulted while scanning numeric literals.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixTable {
    entries: Vec<SiPrefix>,
}

impl PrefixTable {
    /// Creates a table from explicit entries, kept in the given order.
    pub fn new(entries: Vec<SiPrefix>) -> Self {
        Self { entries }
    }

    /// Returns the table entries in match order.
    pub fn entries(&self) -> &[SiPrefix] {
        &self.entries
    }

    /// Returns the first entry whose non-empty symbol starts `rest`.
    pub fn match_symbol(&self, rest: &str) -> Option<&SiPrefix> {
        self.entries
            .iter()
            .find(|p| !p.symbol.is_empty() && rest.starts_with(p.symbol.as_str()))
    }
}

impl Default for PrefixTable {
    /// The standard prefix set: `T,G,M,k,h,"",%,d,c,m,u,n,p`.
    fn default() -> Self {
        Self::new(vec![
            SiPrefix::new("T", 1e12),
            SiPrefix::new("G", 1e9),
            SiPrefix::new("M", 1e6),
            SiPrefix::new("k", 1e3),
            SiPrefix::new("h", 1e2),
            SiPrefix::none(),
            SiPrefix::new("%", 1e-2),
            SiPrefix::new("d", 1e-1),
            SiPrefix::new("c", 1e-2),
            SiPrefix::new("m", 1e-3),
            SiPrefix::new("u", 1e-6),
            SiPrefix::new("n", 1e-9),
            SiPrefix::new("p", 1e-12),
        ])
    }
}

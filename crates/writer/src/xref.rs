use crate::WriteError;
use lopdf::xref::{Xref, XrefEntry, XrefType};

/// Classic cross-reference table with a single subsection starting at 0.
///
/// Offsets are recorded in a `lopdf` [`Xref`]; only the fixed-width
/// 20-byte entry lines are produced here.
#[derive(Debug, Clone)]
pub struct XrefTable {
    xref: Xref,
}

impl Default for XrefTable {
    fn default() -> Self {
        Self::new()
    }
}

impl XrefTable {
    pub fn new() -> Self {
        Self {
            xref: Xref::new(0, XrefType::CrossReferenceTable),
        }
    }

    /// Offsets past 4 GiB cannot be written in a classic table.
    pub fn record(&mut self, id: u32, offset: u64) -> Result<(), WriteError> {
        let offset = u32::try_from(offset).map_err(|_| WriteError::OffsetOverflow(offset))?;
        self.xref.insert(id, XrefEntry::Normal { offset, generation: 0 });
        self.xref.size = self.size();
        Ok(())
    }

    pub fn offset(&self, id: u32) -> Option<u64> {
        match self.xref.get(id) {
            Some(XrefEntry::Normal { offset, .. }) => Some(*offset as u64),
            _ => None,
        }
    }

    /// One more than the highest object number, as written to `/Size`.
    pub fn size(&self) -> u32 {
        self.xref.entries.keys().next_back().map_or(1, |max| max + 1)
    }

    /// Object numbers with no recorded offset are written as free entries.
    pub fn encode(&self) -> Vec<u8> {
        let size = self.size();
        let mut out = Vec::with_capacity(20 * size as usize + 16);
        out.extend_from_slice(format!("xref\n0 {}\n", size).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for id in 1..size {
            match self.xref.get(id) {
                Some(XrefEntry::Normal { offset, generation }) => {
                    out.extend_from_slice(format!("{:010} {:05} n \n", offset, generation).as_bytes())
                }
                _ => out.extend_from_slice(b"0000000000 65535 f \n"),
            }
        }
        out
    }
}

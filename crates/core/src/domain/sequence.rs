// Submission input parsing: amino-acid sequences and device lists

use crate::domain::error::{DomainError, Result};

/// The 20 canonical amino-acid single-letter codes
pub const AMINO_ACID_ALPHABET: &str = "ACDEFGHIKLMNPQRSTVWY";

/// A normalized (uppercased, whitespace-free) protein sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProteinSequence(String);

impl ProteinSequence {
    /// Normalize and validate a raw sequence
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if normalized.is_empty() || !normalized.chars().all(|c| AMINO_ACID_ALPHABET.contains(c)) {
            return Err(DomainError::ValidationError(
                "Invalid amino acid sequence. Use single-letter codes only.".to_string(),
            ));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Single-record FASTA: header line `>{chain_id}`, then the sequence
    pub fn to_fasta(&self, chain_id: &str) -> String {
        format!(">{}\n{}\n", chain_id, self.0)
    }
}

/// Parse a comma-separated device list ("0,1" -> [0, 1])
///
/// A malformed entry fails the whole list.
pub fn parse_devices(raw: &str) -> Result<Vec<u32>> {
    raw.split(',')
        .map(|entry| {
            let entry = entry.trim();
            entry.parse::<u32>().map_err(|_| {
                DomainError::ValidationError(format!("Invalid device id '{}' in '{}'", entry, raw))
            })
        })
        .collect()
}

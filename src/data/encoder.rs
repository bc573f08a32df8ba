// ============================================================
// Layer 4: Name Encoder
// ============================================================
// Turns a batch of names into a rectangular grid of
// character codes that the GRU can consume.
//
// Step 1 - characters to codes (raw ASCII ordinal):
//   ["ABCD", "BCD"] → [[65,66,67,68], [66,67,68]]
//
// Step 2 - suffix padding with 0 up to the longest name
//          IN THIS BATCH (not the whole dataset):
//   → [[65,66,67,68], [66,67,68,0]]
//
// Step 3 - transpose to time-major [seq_len, batch]:
//   → [[65,66], [66,67], [67,68], [68,0]]
//
// The recurrent layer walks the sequence one position at a
// time, so the position axis comes first.
//
// Everything here is pure: same names in, same grid out.
//
// Reference: Rust Book §8 (Strings, Vectors)

/// Code used for padding. Never produced by a printable character.
pub const PAD_CODE: u32 = 0;

/// Encode a single name as its character ordinals.
pub fn name_to_codes(name: &str) -> Vec<u32> {
    name.chars().map(|c| c as u32).collect()
}

/// A padded, time-major batch of encoded names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedNames {
    /// Row-major storage of the [seq_len, batch_size] grid
    codes:      Vec<u32>,
    seq_len:    usize,
    batch_size: usize,
}

impl EncodedNames {
    /// Batch-local maximum name length (= grid row length per item).
    pub fn seq_len(&self) -> usize { self.seq_len }

    pub fn batch_size(&self) -> usize { self.batch_size }

    /// Flat time-major codes: position 0 for every item, then position 1, ...
    pub fn as_time_major(&self) -> &[u32] { &self.codes }
}

// Column views are only needed to check grids in tests; the batcher
// reads the flat time-major buffer.
#[cfg(test)]
impl EncodedNames {
    fn code(&self, position: usize, item: usize) -> Option<u32> {
        if position >= self.seq_len || item >= self.batch_size {
            return None;
        }
        Some(self.codes[position * self.batch_size + item])
    }

    /// All codes for one batch item, padding included.
    fn column(&self, item: usize) -> Vec<u32> {
        (0..self.seq_len)
            .filter_map(|position| self.code(position, item))
            .collect()
    }

    /// Decode one batch item back to its name, dropping padding.
    fn decode(&self, item: usize) -> String {
        self.column(item)
            .into_iter()
            .take_while(|&code| code != PAD_CODE)
            .filter_map(char::from_u32)
            .collect()
    }
}

/// Encode, pad and transpose a batch of names.
pub fn names_to_matrix<S: AsRef<str>>(names: &[S]) -> EncodedNames {
    let rows: Vec<Vec<u32>> = names.iter().map(|n| name_to_codes(n.as_ref())).collect();
    let seq_len = rows.iter().map(Vec::len).max().unwrap_or(0);
    let rows    = pad_rows(rows, seq_len);

    let batch_size = rows.len();
    let mut codes  = Vec::with_capacity(seq_len * batch_size);
    for position in 0..seq_len {
        codes.extend(rows.iter().map(|row| row[position]));
    }

    EncodedNames { codes, seq_len, batch_size }
}

/// Right-pad every row with PAD_CODE up to `max_len`.
fn pad_rows(mut rows: Vec<Vec<u32>>, max_len: usize) -> Vec<Vec<u32>> {
    for row in &mut rows {
        debug_assert!(row.len() <= max_len);
        row.resize(max_len, PAD_CODE);
    }
    rows
}

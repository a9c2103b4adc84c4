//! Immutable lookup tables decoded from embedded big-endian blobs.
//!
//! Every blob is a flat run of 32-bit big-endian integers. Each rule knows its
//! own record layout and decodes it through [`Words`]; the decoded entries end
//! up in a [`SortedTable`], which refuses unsorted or duplicated keys and
//! answers lookups by binary search.
//!
//! Tables are held in `static LazyLock<Result<_, TableLoadError>>` cells next
//! to the rule that owns them, so each blob is decoded at most once per
//! process and a broken blob fails every caller the same way.

use thiserror::Error;
use tracing::{debug, warn};

use crate::codepoint::{ABSENT, CodePointTuple};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableLoadError {
    #[error("table `{table}`: blob length {len} is not a multiple of 4")]
    Misaligned { table: &'static str, len: usize },

    #[error("table `{table}`: record truncated at word {at}")]
    Truncated { table: &'static str, at: usize },

    #[error("table `{table}`: invalid length {len} at word {at}")]
    InvalidLength {
        table: &'static str,
        len: i32,
        at: usize,
    },

    #[error("table `{table}`: invalid code point {cp:#x} at word {at}")]
    InvalidCodePoint {
        table: &'static str,
        cp: i32,
        at: usize,
    },

    #[error("table `{table}`: keys out of order at entry {index}")]
    Unsorted { table: &'static str, index: usize },

    #[error("table `{table}`: duplicate key {key:?} at entry {index}")]
    Duplicate {
        table: &'static str,
        key: CodePointTuple,
        index: usize,
    },
}

/// Upper bound for a single length-prefixed field.
const MAX_FIELD_LEN: i32 = 64;

/// Cursor over the 32-bit words of a blob.
pub(crate) struct Words<'b> {
    table: &'static str,
    bytes: &'b [u8],
    at: usize,
}

impl<'b> Words<'b> {
    pub(crate) fn new(table: &'static str, bytes: &'b [u8]) -> Result<Self, TableLoadError> {
        if bytes.len() % 4 != 0 {
            return Err(TableLoadError::Misaligned {
                table,
                len: bytes.len(),
            });
        }
        Ok(Self {
            table,
            bytes,
            at: 0,
        })
    }

    #[inline]
    pub(crate) fn is_done(&self) -> bool {
        self.at * 4 >= self.bytes.len()
    }

    pub(crate) fn int(&mut self) -> Result<i32, TableLoadError> {
        let start = self.at * 4;
        let word = self
            .bytes
            .get(start..start + 4)
            .and_then(|w| <[u8; 4]>::try_from(w).ok())
            .ok_or(TableLoadError::Truncated {
                table: self.table,
                at: self.at,
            })?;
        self.at += 1;
        Ok(i32::from_be_bytes(word))
    }

    /// A code point slot: a scalar value or [`ABSENT`].
    pub(crate) fn slot(&mut self) -> Result<i32, TableLoadError> {
        let at = self.at;
        let cp = self.int()?;
        if cp == ABSENT || char_of(cp).is_some() {
            Ok(cp)
        } else {
            Err(TableLoadError::InvalidCodePoint {
                table: self.table,
                cp,
                at,
            })
        }
    }

    pub(crate) fn scalar(&mut self) -> Result<char, TableLoadError> {
        let at = self.at;
        let cp = self.int()?;
        char_of(cp).ok_or(TableLoadError::InvalidCodePoint {
            table: self.table,
            cp,
            at,
        })
    }

    /// Two slots. A present second slot after an absent first one is malformed.
    pub(crate) fn tuple(&mut self) -> Result<CodePointTuple, TableLoadError> {
        let at = self.at;
        let cp1 = self.slot()?;
        let cp2 = self.slot()?;
        if cp1 == ABSENT && cp2 != ABSENT {
            return Err(TableLoadError::InvalidCodePoint {
                table: self.table,
                cp: cp2,
                at: at + 1,
            });
        }
        Ok(CodePointTuple(cp1, cp2))
    }

    /// A length-prefixed run of scalars.
    pub(crate) fn scalars(&mut self) -> Result<Box<[char]>, TableLoadError> {
        let at = self.at;
        let len = self.int()?;
        if !(0..=MAX_FIELD_LEN).contains(&len) {
            return Err(TableLoadError::InvalidLength {
                table: self.table,
                len,
                at,
            });
        }
        (0..len).map(|_| self.scalar()).collect()
    }

    /// A 0/1 flag word.
    pub(crate) fn flag(&mut self) -> Result<bool, TableLoadError> {
        let at = self.at;
        match self.int()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(TableLoadError::InvalidLength {
                table: self.table,
                len: other,
                at,
            }),
        }
    }
}

#[inline]
fn char_of(cp: i32) -> Option<char> {
    u32::try_from(cp).ok().and_then(char::from_u32)
}

/// Sorted key → value table with binary-search lookup.
#[derive(Debug)]
pub struct SortedTable<V> {
    name: &'static str,
    entries: Box<[(CodePointTuple, V)]>,
}

impl<V> SortedTable<V> {
    /// Builds a table from entries that must already be strictly ascending.
    pub fn from_entries(
        name: &'static str,
        entries: Vec<(CodePointTuple, V)>,
    ) -> Result<Self, TableLoadError> {
        for (index, pair) in entries.windows(2).enumerate() {
            let (prev, next) = (&pair[0].0, &pair[1].0);
            if prev == next {
                return Err(TableLoadError::Duplicate {
                    table: name,
                    key: *next,
                    index: index + 1,
                });
            }
            if prev > next {
                return Err(TableLoadError::Unsorted {
                    table: name,
                    index: index + 1,
                });
            }
        }
        Ok(Self {
            name,
            entries: entries.into_boxed_slice(),
        })
    }

    /// Sorts derived entries first; duplicates are still rejected.
    pub fn from_unsorted(
        name: &'static str,
        mut entries: Vec<(CodePointTuple, V)>,
    ) -> Result<Self, TableLoadError> {
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Self::from_entries(name, entries)
    }

    #[inline]
    pub fn get(&self, key: &CodePointTuple) -> Option<&V> {
        self.entries
            .binary_search_by(|(k, _)| k.cmp(key))
            .ok()
            .map(|i| &self.entries[i].1)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CodePointTuple, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

/// Decodes `bytes` one record at a time with `record`.
pub(crate) fn decode_records<V>(
    name: &'static str,
    bytes: &[u8],
    mut record: impl FnMut(&mut Words<'_>) -> Result<(CodePointTuple, V), TableLoadError>,
) -> Result<Vec<(CodePointTuple, V)>, TableLoadError> {
    let mut words = Words::new(name, bytes)?;
    let mut entries = Vec::with_capacity(bytes.len() / 16);
    while !words.is_done() {
        entries.push(record(&mut words)?);
    }
    Ok(entries)
}

/// `[key1, key2, value1, value2]` records.
pub fn decode_simple(
    name: &'static str,
    bytes: &[u8],
) -> Result<SortedTable<CodePointTuple>, TableLoadError> {
    let entries = decode_records(name, bytes, |w| Ok((w.tuple()?, w.tuple()?)))?;
    SortedTable::from_entries(name, entries)
}

/// `[key1, key2, len, scalars...]` records.
pub fn decode_expansions(
    name: &'static str,
    bytes: &[u8],
) -> Result<SortedTable<Box<[char]>>, TableLoadError> {
    let entries = decode_records(name, bytes, |w| Ok((w.tuple()?, w.scalars()?)))?;
    SortedTable::from_entries(name, entries)
}

/// Runs `decode` once for a table cell, logging the outcome.
pub(crate) fn load<T>(
    name: &'static str,
    bytes: &'static [u8],
    decode: fn(&'static str, &[u8]) -> Result<T, TableLoadError>,
) -> Result<T, TableLoadError> {
    match decode(name, bytes) {
        Ok(table) => {
            debug!(table = name, bytes = bytes.len(), "decoded lookup table");
            Ok(table)
        }
        Err(e) => {
            warn!(table = name, error = %e, "lookup table failed to load");
            Err(e)
        }
    }
}

/// Borrows a loaded table out of its cell.
#[inline]
pub(crate) fn get<T>(cell: &'static Result<T, TableLoadError>) -> Result<&'static T, TableLoadError> {
    cell.as_ref().map_err(Clone::clone)
}

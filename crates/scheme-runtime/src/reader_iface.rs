//! The reader's contract, not its implementation.
//!
//! spec.md §4.7 and §6 describe the reader (tokenizing source text into
//! `Value`s) as an external collaborator — this crate only needs to name
//! the shape something must satisfy to hand data to the rest of the
//! stack, the way spec.md's "Evaluator contract" names what an
//! evaluator must look like without this crate providing one.

use scheme_core::error::ReadError;
use scheme_core::value::Value;

/// Something that can turn source text into `Value`s one datum at a
/// time. Implemented outside this crate.
pub trait Reader {
    /// Read the next complete datum starting at `source[offset..]`.
    /// Returns `Ok(None)` at end of input (only whitespace/comments
    /// remain), `Ok(Some((value, consumed)))` on success, or the
    /// incomplete/stray-token errors spec.md §7 groups under
    /// `SchemeError::Read`.
    fn read_one(&mut self, source: &str, offset: usize) -> Result<Option<(Value, usize)>, ReadError>;

    /// Read every complete datum in `source`, stopping (without error)
    /// if a trailing partial datum is left dangling — a REPL caller is
    /// expected to keep accumulating input in that case rather than
    /// treat it as a hard parse failure.
    fn read_all(&mut self, source: &str) -> Result<Vec<Value>, ReadError> {
        let mut values = Vec::new();
        let mut offset = 0;
        while offset < source.len() {
            match self.read_one(source, offset)? {
                Some((value, consumed)) => {
                    values.push(value);
                    offset = consumed;
                }
                None => break,
            }
        }
        Ok(values)
    }
}

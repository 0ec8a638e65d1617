//! Fixed six-slot input buffer for verification codes.

/// Number of digits in a verification code.
pub const CODE_LENGTH: usize = 6;

/// Each slot is empty or holds one ASCII decimal digit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CodeBuffer {
    slots: [Option<char>; CODE_LENGTH],
}

/// Parses a single keystroke: `Ok(None)` clears a slot, `Ok(Some(d))` sets it,
/// `Err(())` is anything else.
pub(crate) fn parse_keystroke(raw: &str) -> Result<Option<char>, ()> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(None),
        (Some(ch), None) if ch.is_ascii_digit() => Ok(Some(ch)),
        _ => Err(()),
    }
}

/// Keeps decimal digits only, at most [`CODE_LENGTH`] of them.
#[must_use]
pub fn sanitize_paste(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(CODE_LENGTH)
        .collect()
}

impl CodeBuffer {
    #[must_use]
    pub fn get(&self, index: usize) -> Option<char> {
        self.slots.get(index).copied().flatten()
    }

    /// Writes one slot. Out-of-range indexes and non-digits are ignored.
    pub(crate) fn set(&mut self, index: usize, value: Option<char>) -> bool {
        if value.is_some_and(|ch| !ch.is_ascii_digit()) {
            return false;
        }
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Replaces the whole buffer from already sanitized digits, left to right.
    pub(crate) fn fill(&mut self, digits: &str) {
        let mut source = digits.chars().filter(char::is_ascii_digit);
        for slot in &mut self.slots {
            *slot = source.next();
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots = [None; CODE_LENGTH];
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    #[must_use]
    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Slot-ordered code, only when all slots are filled.
    #[must_use]
    pub fn code(&self) -> Option<String> {
        self.slots.iter().copied().collect()
    }

    #[must_use]
    pub fn slots(&self) -> &[Option<char>; CODE_LENGTH] {
        &self.slots
    }
}

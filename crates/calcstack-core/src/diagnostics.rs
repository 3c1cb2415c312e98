//! Diagnostics: non-fatal warnings collected during one invocation scope.

use crate::error::CoreError;

/// Separator used when joining diagnostics into the side-channel string.
pub const DIAGNOSTICS_DELIMITER: char = ';';

/// Transport header carrying the joined diagnostics.
pub const DIAGNOSTICS_HEADER: &str = "X-Calcstack-Warnings";

/// Ordered warning messages emitted during one capture region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<String>);

impl Diagnostics {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Emit a warning. Never aborts the calculation.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, messages: I) {
        self.0.extend(messages);
    }

    /// Join into the side-channel string.
    ///
    /// Returns `Ok(None)` when nothing was emitted. Messages are not escaped:
    /// a message containing the delimiter is an encoding fault.
    pub fn encode(&self) -> Result<Option<String>, CoreError> {
        if self.0.is_empty() {
            return Ok(None);
        }
        if let Some(bad) = self.0.iter().find(|m| m.contains(DIAGNOSTICS_DELIMITER)) {
            return Err(CoreError::DelimiterInDiagnostic {
                delimiter: DIAGNOSTICS_DELIMITER,
                message: bad.clone(),
            });
        }
        let mut buf = [0u8; 4];
        Ok(Some(self.0.join(DIAGNOSTICS_DELIMITER.encode_utf8(&mut buf))))
    }

    /// Split a side-channel string produced by [`Diagnostics::encode`].
    pub fn decode(encoded: &str) -> Self {
        Self(encoded.split(DIAGNOSTICS_DELIMITER).map(String::from).collect())
    }
}

impl IntoIterator for Diagnostics {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

//! CLI output: error text shown to the user.

use crate::error::AllocError;

/// Map an [`AllocError`] to the message printed on stderr.
pub fn map_error(e: &AllocError) -> String {
    match e {
        AllocError::Open { .. } => format!("{} (check --source or --root)", e),
        other => other.to_string(),
    }
}

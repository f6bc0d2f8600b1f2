//! Shared string predicates for entity fields.

use super::DomainError;

/// Trim `value`, rejecting it when nothing is left.
pub(crate) fn trimmed_non_blank(
    parameter: &'static str,
    value: &str,
) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::blank(parameter));
    }
    Ok(trimmed.to_owned())
}

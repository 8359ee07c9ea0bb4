//! Localized message catalog boundary. A real build would route this through a translation table
//! keyed on `LANG`; this crate carries only the token diagnostics are prefixed with.

/// Prefix for a diagnostic line written to standard error.
pub fn error_prefix() -> &'static str {
    "ERROR:"
}

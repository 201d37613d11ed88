//! Generic dialect.
//!
//! Writes identifiers unquoted, exactly as selected. This is the form shown
//! to users of the visual builder and the form most engines accept for plain
//! lower-case names.

use super::helpers;
use super::SqlDialect;

/// Unquoted, engine-neutral dialect.
#[derive(Debug, Clone, Copy)]
pub struct Generic;

impl SqlDialect for Generic {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_none(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }
}

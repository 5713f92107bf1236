// ABOUTME: Server-side filter expressions for list requests
// ABOUTME: Renders `field = "value"` clauses with quoting so ids cannot break out of the string

use std::fmt;

/// A filter expression understood by the record backend
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Filter(String);

impl Filter {
    /// `field = "value"`
    pub fn eq(field: &str, value: &str) -> Self {
        Self(format!("{} = \"{}\"", field, escape(value)))
    }

    /// Both clauses must hold
    pub fn and(self, other: Filter) -> Self {
        Self(format!("({}) && ({})", self.0, other.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

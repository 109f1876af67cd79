//! String comparison semantics
//!
//! Both culture-sensitive families (current and invariant) use one fixed
//! invariant collation: strings are ordered case-insensitively first, and
//! on a case-insensitive tie the first differing character decides, with
//! lowercase sorting before uppercase. Case-sensitive culture equality is
//! exact equality.

use retarget_types::StringComparison;
use std::cmp::Ordering;

/// Equality of two strings under `mode`
pub fn equals(left: &str, right: &str, mode: StringComparison) -> bool {
    if mode.ignores_case() {
        fold(left) == fold(right)
    } else {
        left == right
    }
}

/// Ordering of two strings under `mode`
pub fn compare(left: &str, right: &str, mode: StringComparison) -> Ordering {
    match mode {
        StringComparison::Ordinal => left.cmp(right),
        StringComparison::OrdinalIgnoreCase => fold(left).cmp(&fold(right)),
        StringComparison::CurrentCultureIgnoreCase | StringComparison::InvariantCultureIgnoreCase => {
            collate_primary(left, right)
        }
        StringComparison::CurrentCulture | StringComparison::InvariantCulture => {
            collate_primary(left, right)
                .then_with(|| case_tie_break(left, right))
                .then_with(|| left.cmp(right))
        }
    }
}

fn fold(s: &str) -> String {
    s.to_lowercase()
}

/// Case-insensitive order; letters compare alphabetically regardless of case
fn collate_primary(left: &str, right: &str) -> Ordering {
    left.chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase))
}

/// Lowercase before uppercase at the first position where case differs
fn case_tie_break(left: &str, right: &str) -> Ordering {
    left.chars()
        .zip(right.chars())
        .find(|(l, r)| l != r)
        .map(|(l, r)| match (l.is_lowercase(), r.is_lowercase()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => Ordering::Equal,
        })
        .unwrap_or(Ordering::Equal)
}

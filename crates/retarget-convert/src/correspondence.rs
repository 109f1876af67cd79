//! Member correspondence strategies
//!
//! A correspondence decides which member of the target type stands in for a
//! member of the source type. The converter never guesses: a member the
//! strategy cannot resolve fails the conversion.

use retarget_types::{MemberInfo, TypeDescriptor};
use std::collections::HashMap;
use std::fmt;

/// Resolves source members to target members
pub trait MemberCorrespondence: Send + Sync + fmt::Debug {
    /// The member of `target` corresponding to `member` of `source`, if any
    fn resolve<'t>(
        &self,
        source: &TypeDescriptor,
        member: &MemberInfo,
        target: &'t TypeDescriptor,
    ) -> Option<&'t MemberInfo>;
}

/// Matches members by identical, case-sensitive name
#[derive(Debug, Clone, Copy, Default)]
pub struct ByName;

impl MemberCorrespondence for ByName {
    fn resolve<'t>(
        &self,
        _source: &TypeDescriptor,
        member: &MemberInfo,
        target: &'t TypeDescriptor,
    ) -> Option<&'t MemberInfo> {
        target.member(&member.name)
    }
}

/// Explicit table of member renames
///
/// Entries registered with [`map_for`](Self::map_for) apply to one source
/// type and take precedence over entries registered with [`map`](Self::map).
/// Members with no entry fall back to name matching unless the mapping is
/// [`strict`](Self::strict).
///
/// ```ignore
/// let mapping = ExplicitMapping::new()
///     .map("Value", "Payload")
///     .map_for("Address", "Zip", "PostalCode");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExplicitMapping {
    renames: HashMap<String, String>,
    scoped: HashMap<(String, String), String>,
    strict: bool,
}

impl ExplicitMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `source_member` to `target_member` on every source type
    pub fn map(mut self, source_member: impl Into<String>, target_member: impl Into<String>) -> Self {
        self.renames.insert(source_member.into(), target_member.into());
        self
    }

    /// Map `source_member` of `source_type` to `target_member`
    pub fn map_for(
        mut self,
        source_type: impl Into<String>,
        source_member: impl Into<String>,
        target_member: impl Into<String>,
    ) -> Self {
        self.scoped
            .insert((source_type.into(), source_member.into()), target_member.into());
        self
    }

    /// Disable the name-matching fallback
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Target member name registered for a source member
    pub fn lookup(&self, source_type: &str, source_member: &str) -> Option<&str> {
        self.scoped
            .get(&(source_type.to_string(), source_member.to_string()))
            .or_else(|| self.renames.get(source_member))
            .map(String::as_str)
    }
}

impl MemberCorrespondence for ExplicitMapping {
    fn resolve<'t>(
        &self,
        source: &TypeDescriptor,
        member: &MemberInfo,
        target: &'t TypeDescriptor,
    ) -> Option<&'t MemberInfo> {
        match self.lookup(&source.name, &member.name) {
            Some(renamed) => target.member(renamed),
            None if self.strict => None,
            None => target.member(&member.name),
        }
    }
}

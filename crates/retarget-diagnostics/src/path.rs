//! Node paths locating a node inside an expression tree
//!
//! Expression trees are built programmatically rather than parsed, so
//! failures are reported against the path from the root lambda down to the
//! offending node instead of a source span.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step from a node to one of its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    /// Body of a lambda
    Body,
    /// Left operand of a binary operation
    Left,
    /// Right operand of a binary operation
    Right,
    /// Operand of a unary operation
    Operand,
    /// Base expression of a member access
    Target,
    /// Receiver of an instance method call
    Instance,
    /// Positional argument of a method call
    Argument(usize),
    /// Test of a conditional
    Test,
    /// Branch taken when the test holds
    IfTrue,
    /// Branch taken when the test fails
    IfFalse,
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body => write!(f, "body"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Operand => write!(f, "operand"),
            Self::Target => write!(f, "target"),
            Self::Instance => write!(f, "instance"),
            Self::Argument(index) => write!(f, "arg[{}]", index),
            Self::Test => write!(f, "test"),
            Self::IfTrue => write!(f, "if_true"),
            Self::IfFalse => write!(f, "if_false"),
        }
    }
}

/// Path from the root of a tree to a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NodePath {
    segments: Vec<PathSegment>,
}

impl NodePath {
    /// The root node
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Path extended by one segment
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }

    /// Push a segment in place
    #[inline]
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// Pop the last segment
    #[inline]
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Segments from the root
    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Check if this is the root path
    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments
    #[inline]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromIterator<PathSegment> for NodePath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

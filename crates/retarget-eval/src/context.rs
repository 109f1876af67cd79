//! Parameter bindings during evaluation

use crate::Value;

/// Values bound to lambda parameters, innermost last
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    bindings: Vec<(String, Value)>,
}

impl EvaluationContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Context starting from captured bindings
    pub fn from_bindings(bindings: Vec<(String, Value)>) -> Self {
        Self { bindings }
    }

    /// Bind a parameter, shadowing earlier bindings of the same name
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.push((name.into(), value));
    }

    /// Innermost value bound to `name`
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| value)
    }

    /// Number of bindings, for restoring with [`truncate`](Self::truncate)
    pub fn depth(&self) -> usize {
        self.bindings.len()
    }

    /// Drop bindings made after `depth`
    pub fn truncate(&mut self, depth: usize) {
        self.bindings.truncate(depth);
    }

    /// Copy of all bindings, for capture by a closure
    pub fn snapshot(&self) -> Vec<(String, Value)> {
        self.bindings.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadowing_and_truncate() {
        let mut ctx = EvaluationContext::new();
        ctx.bind("x", Value::Integer(1));
        let depth = ctx.depth();
        ctx.bind("x", Value::Integer(2));
        assert_eq!(ctx.get("x"), Some(&Value::Integer(2)));

        ctx.truncate(depth);
        assert_eq!(ctx.get("x"), Some(&Value::Integer(1)));
        assert_eq!(ctx.get("y"), None);
    }
}

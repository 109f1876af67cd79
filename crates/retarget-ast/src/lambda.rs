//! Lambdas and predicates

use crate::{BoxExpr, Expression, ParameterExpr, TypeError, TypeErrorKind, TypeResult};
use retarget_types::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A lambda: parameters and a body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lambda {
    /// Parameters in order
    pub parameters: Vec<ParameterExpr>,
    /// Body expression
    pub body: BoxExpr,
}

impl Lambda {
    /// Create a lambda
    pub fn new(parameters: Vec<ParameterExpr>, body: Expression) -> Self {
        Self {
            parameters,
            body: Box::new(body),
        }
    }

    /// Function type of this lambda
    pub fn data_type(&self) -> DataType {
        DataType::function(
            self.parameters.iter().map(|p| p.data_type.clone()).collect(),
            self.body.data_type(),
        )
    }

    /// Result type of the body
    pub fn result_type(&self) -> DataType {
        self.body.data_type()
    }

    /// Check whether this lambda binds a parameter named `name`
    pub fn binds(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }

    /// The single parameter, if there is exactly one
    pub fn single_parameter(&self) -> Option<&ParameterExpr> {
        match self.parameters.as_slice() {
            [param] => Some(param),
            _ => None,
        }
    }
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parameters.as_slice() {
            [param] => write!(f, "{} => {}", param.name, self.body),
            params => {
                write!(f, "(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param.name)?;
                }
                write!(f, ") => {}", self.body)
            }
        }
    }
}

/// A lambda taking exactly one parameter and returning Boolean
///
/// Only the shape is enforced here; whether the tree is well-typed against a
/// registry is checked by [`TypeChecker`](crate::TypeChecker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Lambda", into = "Lambda")]
pub struct Predicate {
    lambda: Lambda,
}

impl Predicate {
    /// Wrap a lambda, checking its shape
    pub fn new(lambda: Lambda) -> TypeResult<Self> {
        if lambda.parameters.len() != 1 {
            return Err(TypeError::new(TypeErrorKind::InvalidLambda {
                message: format!(
                    "a predicate takes exactly one parameter, found {}",
                    lambda.parameters.len()
                ),
            }));
        }
        let body_type = lambda.body.data_type();
        if !body_type.is_boolean() {
            return Err(TypeError::new(TypeErrorKind::NotBoolean {
                found: body_type.to_string(),
            }));
        }
        Ok(Self { lambda })
    }

    /// The input parameter
    pub fn parameter(&self) -> &ParameterExpr {
        &self.lambda.parameters[0]
    }

    /// Type of the input value
    pub fn input_type(&self) -> &DataType {
        &self.parameter().data_type
    }

    /// The body
    pub fn body(&self) -> &Expression {
        &self.lambda.body
    }

    /// Borrow as a lambda
    pub fn as_lambda(&self) -> &Lambda {
        &self.lambda
    }

    /// Unwrap into the underlying lambda
    pub fn into_lambda(self) -> Lambda {
        self.lambda
    }
}

impl TryFrom<Lambda> for Predicate {
    type Error = TypeError;

    fn try_from(lambda: Lambda) -> Result<Self, Self::Error> {
        Self::new(lambda)
    }
}

impl From<Predicate> for Lambda {
    fn from(predicate: Predicate) -> Self {
        predicate.lambda
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lambda)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConstantExpr, Literal};

    fn constant(value: Literal) -> Expression {
        let data_type = value.data_type();
        Expression::Constant(ConstantExpr { value, data_type })
    }

    #[test]
    fn test_predicate_shape() {
        let param = ParameterExpr::new("model", DataType::named("Model"));
        let predicate = Predicate::new(Lambda::new(vec![param], constant(Literal::Boolean(true)))).unwrap();

        assert_eq!(predicate.input_type(), &DataType::named("Model"));
        assert_eq!(predicate.to_string(), "model => true");
        assert_eq!(
            predicate.as_lambda().data_type(),
            DataType::predicate(DataType::named("Model"))
        );
    }

    #[test]
    fn test_predicate_rejects_two_parameters() {
        let lambda = Lambda::new(
            vec![
                ParameterExpr::new("a", DataType::String),
                ParameterExpr::new("b", DataType::String),
            ],
            constant(Literal::Boolean(true)),
        );
        assert_eq!(lambda.to_string(), "(a, b) => true");

        let err = Predicate::new(lambda).unwrap_err();
        assert!(matches!(err.kind, TypeErrorKind::InvalidLambda { .. }));
    }

    #[test]
    fn test_predicate_rejects_non_boolean_body() {
        let lambda = Lambda::new(
            vec![ParameterExpr::new("a", DataType::String)],
            constant(Literal::from("x")),
        );
        let err = Predicate::new(lambda).unwrap_err();
        assert_eq!(err.kind, TypeErrorKind::NotBoolean { found: "String".into() });
    }
}

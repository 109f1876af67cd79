//! Type checking of complete trees
//!
//! Trees that come from outside the builder (deserialized, or assembled by
//! hand) carry a recorded type on every node. The checker recomputes each
//! node's type from its children and rejects the tree at the first node
//! whose recorded type disagrees, or whose children are ill-typed.

use crate::{Expression, Lambda, ParameterExpr, Predicate, TypeError, TypeErrorKind, TypeResult, TypeRules};
use retarget_diagnostics::{NodePath, PathSegment};
use retarget_types::{DataType, TypeCoercer, TypeRegistry};

/// Verifies trees against a type registry
#[derive(Debug, Clone, Copy)]
pub struct TypeChecker<'r> {
    rules: TypeRules<'r>,
    coercer: TypeCoercer,
}

impl<'r> TypeChecker<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            rules: TypeRules::new(registry),
            coercer: TypeCoercer::new(),
        }
    }

    /// Check a predicate, including that its input type is registered
    pub fn check_predicate(&self, predicate: &Predicate) -> TypeResult<()> {
        self.check_lambda(predicate.as_lambda()).map(|_| ())
    }

    /// Check a lambda with no enclosing scope, returning its function type
    pub fn check_lambda(&self, lambda: &Lambda) -> TypeResult<DataType> {
        let mut walk = Walk {
            checker: self,
            scope: Vec::new(),
            path: NodePath::root(),
        };
        walk.lambda(lambda)
    }

    /// Check a free-standing expression whose parameters are bound by `scope`
    pub fn check_expression<'e>(
        &self,
        expr: &'e Expression,
        scope: &'e [ParameterExpr],
    ) -> TypeResult<DataType> {
        let mut walk = Walk {
            checker: self,
            scope: scope.iter().collect(),
            path: NodePath::root(),
        };
        walk.expression(expr)
    }

    fn check_declared(&self, data_type: &DataType) -> Result<(), TypeErrorKind> {
        match data_type {
            DataType::Named(name) if !self.rules.registry().contains(name) => {
                Err(TypeErrorKind::UnknownType { name: name.clone() })
            }
            DataType::List(element) => self.check_declared(element),
            DataType::Function { parameters, result } => {
                for parameter in parameters {
                    self.check_declared(parameter)?;
                }
                self.check_declared(result)
            }
            _ => Ok(()),
        }
    }
}

/// State of one traversal
struct Walk<'c, 'r, 'e> {
    checker: &'c TypeChecker<'r>,
    /// Bound parameters, innermost last
    scope: Vec<&'e ParameterExpr>,
    path: NodePath,
}

impl<'e> Walk<'_, '_, 'e> {
    fn fail(&self, kind: TypeErrorKind) -> TypeError {
        TypeError {
            kind,
            path: self.path.clone(),
        }
    }

    fn child(&mut self, segment: PathSegment, expr: &'e Expression) -> TypeResult<DataType> {
        self.path.push(segment);
        let result = self.expression(expr);
        self.path.pop();
        result
    }

    fn expect(&self, context: &str, recorded: &DataType, computed: DataType) -> TypeResult<DataType> {
        if *recorded == computed {
            Ok(computed)
        } else {
            Err(self.fail(TypeErrorKind::TypeMismatch {
                context: context.to_string(),
                expected: computed.to_string(),
                found: recorded.to_string(),
            }))
        }
    }

    fn lambda(&mut self, lambda: &'e Lambda) -> TypeResult<DataType> {
        for parameter in &lambda.parameters {
            self.checker
                .check_declared(&parameter.data_type)
                .map_err(|kind| self.fail(kind))?;
        }
        let depth = self.scope.len();
        self.scope.extend(lambda.parameters.iter());
        self.path.push(PathSegment::Body);
        let body = self.expression(&lambda.body);
        self.path.pop();
        self.scope.truncate(depth);
        body?;
        Ok(lambda.data_type())
    }

    fn expression(&mut self, expr: &'e Expression) -> TypeResult<DataType> {
        let rules = self.checker.rules;
        match expr {
            Expression::Parameter(p) => {
                let bound = self
                    .scope
                    .iter()
                    .rev()
                    .find(|bound| bound.name == p.name)
                    .ok_or_else(|| self.fail(TypeErrorKind::UnboundParameter { name: p.name.clone() }))?;
                if bound.data_type != p.data_type {
                    return Err(self.fail(TypeErrorKind::ParameterTypeMismatch {
                        name: p.name.clone(),
                        declared: bound.data_type.to_string(),
                        referenced: p.data_type.to_string(),
                    }));
                }
                Ok(p.data_type.clone())
            }
            Expression::Member(m) => {
                let target = self.child(PathSegment::Target, &m.target)?;
                let info = rules.member(&target, &m.member).map_err(|kind| self.fail(kind))?;
                if target.type_name() != Some(m.declaring_type.as_str()) {
                    return Err(self.fail(TypeErrorKind::TypeMismatch {
                        context: format!("declaring type of '{}'", m.member),
                        expected: target.to_string(),
                        found: m.declaring_type.clone(),
                    }));
                }
                self.expect(&format!("member '{}'", m.member), &m.data_type, info.data_type)
            }
            Expression::Constant(c) => {
                let accepted = if c.value.is_null() {
                    c.data_type.is_nullable()
                } else {
                    self.checker
                        .coercer
                        .can_implicitly_convert(&c.value.data_type(), &c.data_type)
                };
                if accepted {
                    Ok(c.data_type.clone())
                } else {
                    Err(self.fail(TypeErrorKind::TypeMismatch {
                        context: "constant".to_string(),
                        expected: c.data_type.to_string(),
                        found: c.value.data_type().to_string(),
                    }))
                }
            }
            Expression::Binary(b) => {
                let left = self.child(PathSegment::Left, &b.left)?;
                let right = self.child(PathSegment::Right, &b.right)?;
                let computed = rules.binary(b.op, &left, &right).map_err(|kind| self.fail(kind))?;
                self.expect(b.op.symbol(), &b.data_type, computed)
            }
            Expression::Unary(u) => {
                let operand = self.child(PathSegment::Operand, &u.operand)?;
                let computed = rules.unary(u.op, &operand).map_err(|kind| self.fail(kind))?;
                self.expect(u.op.symbol(), &u.data_type, computed)
            }
            Expression::Conditional(c) => {
                let test = self.child(PathSegment::Test, &c.test)?;
                let if_true = self.child(PathSegment::IfTrue, &c.if_true)?;
                let if_false = self.child(PathSegment::IfFalse, &c.if_false)?;
                let computed = rules
                    .conditional(&test, &if_true, &if_false)
                    .map_err(|kind| self.fail(kind))?;
                self.expect("conditional", &c.data_type, computed)
            }
            Expression::Call(c) => {
                let instance = match &c.instance {
                    Some(instance) => Some(self.child(PathSegment::Instance, instance)?),
                    None => None,
                };
                let mut arguments = Vec::with_capacity(c.arguments.len());
                for (index, argument) in c.arguments.iter().enumerate() {
                    arguments.push(self.child(PathSegment::Argument(index), argument)?);
                }
                rules
                    .call(&c.method, instance.as_ref(), &arguments)
                    .map_err(|kind| self.fail(kind))
            }
            Expression::Lambda(l) => self.lambda(l),
        }
    }
}

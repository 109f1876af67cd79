//! Predicate evaluation engine
//!
//! Evaluates typed expression trees over in-memory [`Value`]s. Member reads
//! on records look fields up by name, so a predicate over one record type
//! runs against any record carrying fields of the same names.

use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::operators;
use crate::registry::{Invocation, MethodRegistry};
use crate::value::{Closure, Value};
use retarget_ast::{BinaryExpr, BinaryOp, CallExpr, Expression, Lambda, Predicate, UnaryOp};

/// Tree evaluator
#[derive(Debug, Clone)]
pub struct Evaluator {
    /// Method implementations
    methods: MethodRegistry,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Create an evaluator with the standard method catalog
    pub fn new() -> Self {
        Self {
            methods: MethodRegistry::standard(),
        }
    }

    /// Create an evaluator with a custom registry
    pub fn with_registry(methods: MethodRegistry) -> Self {
        Self { methods }
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.methods
    }

    pub fn registry_mut(&mut self) -> &mut MethodRegistry {
        &mut self.methods
    }

    /// Apply a predicate to one item; null counts as no match
    pub fn test(&self, predicate: &Predicate, item: &Value) -> EvalResult<bool> {
        match self.evaluate(predicate.as_lambda(), std::slice::from_ref(item))? {
            Value::Boolean(b) => Ok(b),
            Value::Null => Ok(false),
            other => Err(EvalError::type_mismatch("Boolean", other.type_name())),
        }
    }

    /// Items matching a predicate, in input order
    pub fn filter<'v, I>(&self, predicate: &Predicate, items: I) -> EvalResult<Vec<Value>>
    where
        I: IntoIterator<Item = &'v Value>,
    {
        let mut matched = Vec::new();
        for item in items {
            if self.test(predicate, item)? {
                matched.push(item.clone());
            }
        }
        Ok(matched)
    }

    /// Apply a lambda to arguments
    pub fn evaluate(&self, lambda: &Lambda, arguments: &[Value]) -> EvalResult<Value> {
        self.apply(lambda, EvaluationContext::new(), arguments)
    }

    /// Call a closure value
    pub fn invoke(&self, function: &Value, arguments: &[Value]) -> EvalResult<Value> {
        match function {
            Value::Closure(closure) => self.apply(
                &closure.lambda,
                EvaluationContext::from_bindings(closure.environment.clone()),
                arguments,
            ),
            other => Err(EvalError::type_mismatch("Function", other.type_name())),
        }
    }

    fn apply(
        &self,
        lambda: &Lambda,
        mut ctx: EvaluationContext,
        arguments: &[Value],
    ) -> EvalResult<Value> {
        if lambda.parameters.len() != arguments.len() {
            return Err(EvalError::ArgumentCount {
                callee: lambda.to_string(),
                expected: lambda.parameters.len(),
                found: arguments.len(),
            });
        }
        for (param, value) in lambda.parameters.iter().zip(arguments) {
            ctx.bind(param.name.clone(), value.clone());
        }
        self.evaluate_expression(&lambda.body, &mut ctx)
    }

    /// Evaluate an expression under the given bindings
    pub fn evaluate_expression(
        &self,
        expr: &Expression,
        ctx: &mut EvaluationContext,
    ) -> EvalResult<Value> {
        match expr {
            Expression::Parameter(p) => {
                ctx.get(&p.name)
                    .cloned()
                    .ok_or_else(|| EvalError::UnboundParameter {
                        name: p.name.clone(),
                    })
            }
            Expression::Constant(c) => Ok(Value::from(&c.value)),
            Expression::Member(m) => {
                let target = self.evaluate_expression(&m.target, ctx)?;
                match target {
                    Value::Record(record) => {
                        record
                            .get(&m.member)
                            .cloned()
                            .ok_or_else(|| EvalError::MissingField {
                                type_name: record.type_name.clone(),
                                field: m.member.clone(),
                            })
                    }
                    Value::Null => Err(EvalError::null_reference(format!(
                        "member access '{}'",
                        m.member
                    ))),
                    other => Err(EvalError::type_mismatch("Record", other.type_name())),
                }
            }
            Expression::Binary(b) => self.eval_binary(b, ctx),
            Expression::Unary(u) => {
                let operand = self.evaluate_expression(&u.operand, ctx)?;
                match u.op {
                    UnaryOp::Not => Ok(operators::as_logical(&operand)?
                        .map_or(Value::Null, |b| Value::Boolean(!b))),
                    UnaryOp::Negate => operators::negate(&operand),
                    UnaryOp::IsNull => Ok(Value::Boolean(operand.is_null())),
                    UnaryOp::IsNotNull => Ok(Value::Boolean(!operand.is_null())),
                }
            }
            Expression::Conditional(c) => {
                let test = self.evaluate_expression(&c.test, ctx)?;
                if operators::as_logical(&test)? == Some(true) {
                    self.evaluate_expression(&c.if_true, ctx)
                } else {
                    self.evaluate_expression(&c.if_false, ctx)
                }
            }
            Expression::Call(call) => self.eval_call(call, ctx),
            Expression::Lambda(lambda) => Ok(Value::Closure(Box::new(Closure {
                lambda: lambda.clone(),
                environment: ctx.snapshot(),
            }))),
        }
    }

    fn eval_binary(&self, b: &BinaryExpr, ctx: &mut EvaluationContext) -> EvalResult<Value> {
        let left = self.evaluate_expression(&b.left, ctx)?;

        // Short-circuit forms decide before touching the right operand
        match (b.op, &left) {
            (BinaryOp::And, Value::Boolean(false)) => return Ok(Value::Boolean(false)),
            (BinaryOp::Or, Value::Boolean(true)) => return Ok(Value::Boolean(true)),
            _ => {}
        }
        if b.op == BinaryOp::Coalesce && !left.is_null() {
            return Ok(left);
        }

        let right = self.evaluate_expression(&b.right, ctx)?;
        match b.op {
            BinaryOp::And => operators::and(&left, &right),
            BinaryOp::Or => operators::or(&left, &right),
            BinaryOp::Coalesce => Ok(right),
            BinaryOp::Equal => Ok(Value::Boolean(operators::values_equal(&left, &right))),
            BinaryOp::NotEqual => Ok(Value::Boolean(!operators::values_equal(&left, &right))),
            BinaryOp::Less
            | BinaryOp::LessOrEqual
            | BinaryOp::Greater
            | BinaryOp::GreaterOrEqual => operators::ordering(b.op, &left, &right),
            BinaryOp::Add
            | BinaryOp::Subtract
            | BinaryOp::Multiply
            | BinaryOp::Divide
            | BinaryOp::Modulo => operators::arithmetic(b.op, &left, &right),
        }
    }

    fn eval_call(&self, call: &CallExpr, ctx: &mut EvaluationContext) -> EvalResult<Value> {
        let implementation = self
            .methods
            .get(&call.method)
            .ok_or_else(|| EvalError::UnknownMethod {
                method: call.method.to_string(),
            })?;

        let instance = match &call.instance {
            Some(receiver) => Some(self.evaluate_expression(receiver, ctx)?),
            None => None,
        };
        let arguments = call
            .arguments
            .iter()
            .map(|arg| self.evaluate_expression(arg, ctx))
            .collect::<EvalResult<Vec<_>>>()?;

        if arguments.len() != call.method.arity() {
            return Err(EvalError::ArgumentCount {
                callee: call.method.qualified_name(),
                expected: call.method.arity(),
                found: arguments.len(),
            });
        }

        implementation(&Invocation {
            method: &call.method,
            instance: instance.as_ref(),
            arguments: &arguments,
            evaluator: self,
        })
    }
}

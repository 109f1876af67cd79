//! Typed construction of expression trees
//!
//! Every constructor checks its operands against the typing rules, so a
//! tree assembled through `TreeBuilder` is well-typed by construction.

use crate::{
    BinaryExpr, BinaryOp, CallExpr, ConditionalExpr, ConstantExpr, Expression, Lambda, Literal,
    MemberExpr, MethodRef, ParameterExpr, Predicate, TypeError, TypeResult, TypeRules, UnaryExpr,
    UnaryOp,
};
use retarget_diagnostics::PathSegment;
use retarget_types::{DataType, StringComparison, TypeRegistry};

/// Builds well-typed expressions against a type registry
///
/// ```ignore
/// let b = TreeBuilder::new(&registry);
/// let model = b.parameter("model", DataType::named("Model"));
/// let body = b.equal(b.member(b.param(&model), "Value")?, b.string("A"))?;
/// let predicate = b.predicate(model, body)?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder<'r> {
    rules: TypeRules<'r>,
}

impl<'r> TreeBuilder<'r> {
    /// Create a builder over `registry`
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            rules: TypeRules::new(registry),
        }
    }

    /// Typing rules used by this builder
    pub fn rules(&self) -> &TypeRules<'r> {
        &self.rules
    }

    // === Parameters and members ===

    /// Declare a parameter
    pub fn parameter(&self, name: impl Into<String>, data_type: DataType) -> ParameterExpr {
        ParameterExpr::new(name, data_type)
    }

    /// Reference a declared parameter
    pub fn param(&self, parameter: &ParameterExpr) -> Expression {
        Expression::Parameter(parameter.clone())
    }

    /// Read `member` from `target`
    pub fn member(&self, target: Expression, member: &str) -> TypeResult<Expression> {
        let target_type = target.data_type();
        let info = self.rules.member(&target_type, member)?;
        let declaring_type = target_type
            .type_name()
            .map(str::to_string)
            .unwrap_or_default();
        Ok(Expression::Member(MemberExpr {
            target: Box::new(target),
            member: info.name,
            declaring_type,
            data_type: info.data_type,
        }))
    }

    /// Read a chain of members, e.g. `["Address", "City"]`
    pub fn member_path(&self, target: Expression, path: &[&str]) -> TypeResult<Expression> {
        path.iter().try_fold(target, |acc, member| self.member(acc, member))
    }

    // === Constants ===

    /// Literal constant typed by its own value
    pub fn constant(&self, value: impl Into<Literal>) -> Expression {
        let value = value.into();
        let data_type = value.data_type();
        Expression::Constant(ConstantExpr { value, data_type })
    }

    /// Null constant typed as `data_type`
    pub fn null(&self, data_type: DataType) -> Expression {
        Expression::Constant(ConstantExpr {
            value: Literal::Null,
            data_type,
        })
    }

    /// String constant
    pub fn string(&self, value: impl Into<String>) -> Expression {
        self.constant(Literal::String(value.into()))
    }

    /// Integer constant
    pub fn integer(&self, value: i32) -> Expression {
        self.constant(Literal::Integer(value))
    }

    /// Boolean constant
    pub fn boolean(&self, value: bool) -> Expression {
        self.constant(Literal::Boolean(value))
    }

    /// String comparison mode constant
    pub fn comparison(&self, mode: StringComparison) -> Expression {
        self.constant(Literal::Comparison(mode))
    }

    // === Operators ===

    /// Binary operation
    pub fn binary(&self, op: BinaryOp, left: Expression, right: Expression) -> TypeResult<Expression> {
        let data_type = self.rules.binary(op, &left.data_type(), &right.data_type())?;
        Ok(Expression::Binary(BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
            data_type,
        }))
    }

    pub fn equal(&self, left: Expression, right: Expression) -> TypeResult<Expression> {
        self.binary(BinaryOp::Equal, left, right)
    }

    pub fn not_equal(&self, left: Expression, right: Expression) -> TypeResult<Expression> {
        self.binary(BinaryOp::NotEqual, left, right)
    }

    pub fn less(&self, left: Expression, right: Expression) -> TypeResult<Expression> {
        self.binary(BinaryOp::Less, left, right)
    }

    pub fn greater(&self, left: Expression, right: Expression) -> TypeResult<Expression> {
        self.binary(BinaryOp::Greater, left, right)
    }

    pub fn and(&self, left: Expression, right: Expression) -> TypeResult<Expression> {
        self.binary(BinaryOp::And, left, right)
    }

    pub fn or(&self, left: Expression, right: Expression) -> TypeResult<Expression> {
        self.binary(BinaryOp::Or, left, right)
    }

    /// Unary operation
    pub fn unary(&self, op: UnaryOp, operand: Expression) -> TypeResult<Expression> {
        let data_type = self.rules.unary(op, &operand.data_type())?;
        Ok(Expression::Unary(UnaryExpr {
            op,
            operand: Box::new(operand),
            data_type,
        }))
    }

    pub fn not(&self, operand: Expression) -> TypeResult<Expression> {
        self.unary(UnaryOp::Not, operand)
    }

    pub fn is_null(&self, operand: Expression) -> TypeResult<Expression> {
        self.unary(UnaryOp::IsNull, operand)
    }

    /// Conditional expression
    pub fn conditional(
        &self,
        test: Expression,
        if_true: Expression,
        if_false: Expression,
    ) -> TypeResult<Expression> {
        let data_type = self
            .rules
            .conditional(&test.data_type(), &if_true.data_type(), &if_false.data_type())?;
        Ok(Expression::Conditional(ConditionalExpr {
            test: Box::new(test),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
            data_type,
        }))
    }

    // === Calls ===

    /// Call a static method
    pub fn call(&self, method: MethodRef, arguments: Vec<Expression>) -> TypeResult<Expression> {
        self.invoke(method, None, arguments)
    }

    /// Call an instance method on `instance`
    pub fn call_instance(
        &self,
        method: MethodRef,
        instance: Expression,
        arguments: Vec<Expression>,
    ) -> TypeResult<Expression> {
        self.invoke(method, Some(instance), arguments)
    }

    /// Call `method` with an optional receiver
    pub fn invoke(
        &self,
        method: MethodRef,
        instance: Option<Expression>,
        arguments: Vec<Expression>,
    ) -> TypeResult<Expression> {
        let instance_type = instance.as_ref().map(Expression::data_type);
        let argument_types: Vec<DataType> = arguments.iter().map(Expression::data_type).collect();
        self.rules
            .call(&method, instance_type.as_ref(), &argument_types)
            .map_err(|kind| locate_call_error(TypeError::new(kind)))?;
        Ok(Expression::Call(CallExpr {
            method,
            instance: instance.map(Box::new),
            arguments,
        }))
    }

    // === Lambdas ===

    /// Lambda over `parameters`
    pub fn lambda(&self, parameters: Vec<ParameterExpr>, body: Expression) -> Lambda {
        Lambda::new(parameters, body)
    }

    /// Nested lambda as an expression, e.g. the argument of `Any`
    pub fn lambda_expr(&self, parameters: Vec<ParameterExpr>, body: Expression) -> Expression {
        Expression::Lambda(self.lambda(parameters, body))
    }

    /// Single-parameter boolean lambda
    pub fn predicate(&self, parameter: ParameterExpr, body: Expression) -> TypeResult<Predicate> {
        Predicate::new(Lambda::new(vec![parameter], body))
    }
}

fn locate_call_error(err: TypeError) -> TypeError {
    match &err.kind {
        crate::TypeErrorKind::ArgumentType { index, .. } => {
            let index = *index;
            err.under(PathSegment::Argument(index))
        }
        crate::TypeErrorKind::InvalidReceiver { .. } => err.under(PathSegment::Instance),
        _ => err,
    }
}

//! Rewriting predicates from a source type onto a target type
//!
//! The rewrite is a single depth-first pass. Member reads on any value
//! derived from the input parameter are redirected to the corresponding
//! member of the target type. Lambda parameters ranging over a converted
//! list are retyped to its new element type. Every other node is rebuilt
//! around its converted children and
//! re-typed with the same rules the tree builder applies, so the output is
//! well-typed or the conversion fails.

use crate::{ByName, ConvertError, ConvertResult, MemberCorrespondence, MemberMap, MemberMapCache};
use log::{debug, trace};
use retarget_ast::{
    BinaryExpr, BinaryOp, CallExpr, ConditionalExpr, Expression, Lambda, MemberExpr, ParameterExpr, Predicate,
    TypeChecker, TypeErrorKind, TypeRules, UnaryExpr,
};
use retarget_diagnostics::{NodePath, PathSegment};
use retarget_types::{DataType, TypeCoercer, TypeDescriptor, TypeRegistry};
use std::sync::Arc;

/// Converts predicates between structurally similar record types
///
/// A converter holds the type registry both types are resolved through and
/// the member correspondence strategy. Resolved member maps are cached per
/// `(source, target)` pair, so one converter can be shared across threads
/// and reused for many conversions.
#[derive(Debug)]
pub struct ExpressionConverter {
    registry: TypeRegistry,
    correspondence: Arc<dyn MemberCorrespondence>,
    cache: MemberMapCache,
}

impl ExpressionConverter {
    /// Create a converter matching members by name
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            registry,
            correspondence: Arc::new(ByName),
            cache: MemberMapCache::new(),
        }
    }

    /// Use `correspondence` to match members
    pub fn with_correspondence(mut self, correspondence: impl MemberCorrespondence + 'static) -> Self {
        self.correspondence = Arc::new(correspondence);
        self.cache.clear();
        self
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &MemberMapCache {
        &self.cache
    }

    /// Resolved member map for a pair of registered types
    pub fn member_map(&self, source: &str, target: &str) -> ConvertResult<Arc<MemberMap>> {
        if let Some(map) = self.cache.get(source, target) {
            return Ok(map);
        }
        let source_desc = self.descriptor(source)?;
        let target_desc = self.descriptor(target)?;
        Ok(self.cache.get_or_insert_with(source, target, || {
            MemberMap::build(self.correspondence.as_ref(), &source_desc, &target_desc)
        }))
    }

    /// Convert a predicate over `source` into one over `target`
    pub fn convert(&self, predicate: &Predicate, source: &str, target: &str) -> ConvertResult<Predicate> {
        let (lambda, substitution) = self.rewrite(predicate.as_lambda(), source, target)?;
        let body_type = lambda.result_type();
        if !body_type.is_boolean() {
            let reason = format!("predicate body became {}", body_type);
            return Err(match substitution {
                Some(sub) => sub.incompatible(reason, &NodePath::root().child(PathSegment::Body)),
                None => ConvertError::malformed(reason, &NodePath::root()),
            });
        }
        Predicate::new(lambda).map_err(|err| ConvertError::malformed(err.kind.to_string(), &err.path))
    }

    /// Convert a single-parameter lambda of any result type
    pub fn convert_lambda(&self, lambda: &Lambda, source: &str, target: &str) -> ConvertResult<Lambda> {
        self.rewrite(lambda, source, target).map(|(lambda, _)| lambda)
    }

    fn descriptor(&self, name: &str) -> ConvertResult<Arc<TypeDescriptor>> {
        self.registry
            .get(name)
            .ok_or_else(|| ConvertError::UnknownType { name: name.to_string() })
    }

    fn rewrite(
        &self,
        lambda: &Lambda,
        source: &str,
        target: &str,
    ) -> ConvertResult<(Lambda, Option<Substitution>)> {
        self.descriptor(source)?;
        self.descriptor(target)?;

        let root = NodePath::root();
        let parameter = lambda.single_parameter().ok_or_else(|| {
            ConvertError::malformed(
                format!(
                    "expected a single-parameter lambda, found {} parameters",
                    lambda.parameters.len()
                ),
                &root,
            )
        })?;
        let source_type = DataType::named(source);
        if parameter.data_type != source_type {
            return Err(ConvertError::malformed(
                format!(
                    "parameter '{}' is typed {}, expected {}",
                    parameter.name, parameter.data_type, source_type
                ),
                &root,
            ));
        }
        TypeChecker::new(&self.registry)
            .check_lambda(lambda)
            .map_err(|err| ConvertError::malformed(err.kind.to_string(), &err.path))?;

        debug!("converting {} from {} to {}", lambda, source, target);

        let replacement = ParameterExpr::new(parameter.name.clone(), DataType::named(target));
        let mut rewriter = Rewriter {
            converter: self,
            rules: TypeRules::new(&self.registry),
            coercer: TypeCoercer::new(),
            scope: vec![Binding {
                original: parameter.clone(),
                replacement: replacement.clone(),
                substituted: true,
            }],
            path: root.child(PathSegment::Body),
        };
        let body = rewriter.visit(&lambda.body)?;
        let converted = Lambda::new(vec![replacement], body.expr);

        debug!("converted to {}", converted);
        Ok((converted, body.substitution))
    }
}

/// A parameter in scope during the rewrite
struct Binding {
    original: ParameterExpr,
    replacement: ParameterExpr,
    /// Retyped to a target type, either the root parameter or an element of
    /// a converted list
    substituted: bool,
}

/// A member read that was redirected to the target type
#[derive(Debug, Clone)]
struct Substitution {
    source_type: String,
    member: String,
    target_type: String,
    target_member: String,
}

impl Substitution {
    fn incompatible(self, reason: impl Into<String>, path: &NodePath) -> ConvertError {
        ConvertError::IncompatibleMemberType {
            source_type: self.source_type,
            member: self.member,
            target_type: self.target_type,
            target_member: self.target_member,
            reason: reason.into(),
            path: path.clone(),
        }
    }
}

/// A converted subtree
struct Converted {
    expr: Expression,
    /// Evaluates to a value read through a substituted parameter
    rooted: bool,
    /// First member substitution inside the subtree
    substitution: Option<Substitution>,
}

impl Converted {
    fn plain(expr: Expression) -> Self {
        Self {
            expr,
            rooted: false,
            substitution: None,
        }
    }
}

struct Rewriter<'c> {
    converter: &'c ExpressionConverter,
    rules: TypeRules<'c>,
    coercer: TypeCoercer,
    scope: Vec<Binding>,
    path: NodePath,
}

impl Rewriter<'_> {
    fn child(&mut self, segment: PathSegment, expr: &Expression) -> ConvertResult<Converted> {
        self.path.push(segment);
        let result = self.visit(expr);
        self.path.pop();
        result
    }

    /// Re-typing of a rebuilt node failed
    fn retype_failed(&self, kind: TypeErrorKind, substitution: Option<Substitution>) -> ConvertError {
        match substitution {
            Some(sub) => sub.incompatible(kind.to_string(), &self.path),
            None => ConvertError::malformed(kind.to_string(), &self.path),
        }
    }

    fn visit(&mut self, expr: &Expression) -> ConvertResult<Converted> {
        match expr {
            Expression::Parameter(p) => {
                let binding = self
                    .scope
                    .iter()
                    .rev()
                    .find(|binding| binding.original.name == p.name)
                    .ok_or_else(|| {
                        ConvertError::malformed(format!("unbound parameter '{}'", p.name), &self.path)
                    })?;
                Ok(Converted {
                    expr: Expression::Parameter(binding.replacement.clone()),
                    rooted: binding.substituted,
                    substitution: None,
                })
            }

            Expression::Member(m) => {
                let target = self.child(PathSegment::Target, &m.target)?;
                if target.rooted {
                    self.redirect_member(m, target)
                } else {
                    let base_type = target.expr.data_type();
                    let info = self
                        .rules
                        .member(&base_type, &m.member)
                        .map_err(|kind| self.retype_failed(kind, target.substitution.clone()))?;
                    let declaring_type = base_type
                        .type_name()
                        .map_or_else(|| m.declaring_type.clone(), str::to_string);
                    Ok(Converted {
                        expr: Expression::Member(MemberExpr {
                            target: Box::new(target.expr),
                            member: info.name,
                            declaring_type,
                            data_type: info.data_type,
                        }),
                        rooted: false,
                        substitution: target.substitution,
                    })
                }
            }

            Expression::Constant(_) => Ok(Converted::plain(expr.clone())),

            Expression::Binary(b) => {
                let left = self.child(PathSegment::Left, &b.left)?;
                let right = self.child(PathSegment::Right, &b.right)?;
                let rooted = b.op == BinaryOp::Coalesce && (left.rooted || right.rooted);
                let substitution = left.substitution.or(right.substitution);
                let data_type = self
                    .rules
                    .binary(b.op, &left.expr.data_type(), &right.expr.data_type())
                    .map_err(|kind| self.retype_failed(kind, substitution.clone()))?;
                Ok(Converted {
                    expr: Expression::Binary(BinaryExpr {
                        op: b.op,
                        left: Box::new(left.expr),
                        right: Box::new(right.expr),
                        data_type,
                    }),
                    rooted,
                    substitution,
                })
            }

            Expression::Unary(u) => {
                let operand = self.child(PathSegment::Operand, &u.operand)?;
                let data_type = self
                    .rules
                    .unary(u.op, &operand.expr.data_type())
                    .map_err(|kind| self.retype_failed(kind, operand.substitution.clone()))?;
                Ok(Converted {
                    expr: Expression::Unary(UnaryExpr {
                        op: u.op,
                        operand: Box::new(operand.expr),
                        data_type,
                    }),
                    rooted: false,
                    substitution: operand.substitution,
                })
            }

            Expression::Conditional(c) => {
                let test = self.child(PathSegment::Test, &c.test)?;
                let if_true = self.child(PathSegment::IfTrue, &c.if_true)?;
                let if_false = self.child(PathSegment::IfFalse, &c.if_false)?;
                let rooted = if_true.rooted || if_false.rooted;
                let substitution = test
                    .substitution
                    .or(if_true.substitution)
                    .or(if_false.substitution);
                let data_type = self
                    .rules
                    .conditional(
                        &test.expr.data_type(),
                        &if_true.expr.data_type(),
                        &if_false.expr.data_type(),
                    )
                    .map_err(|kind| self.retype_failed(kind, substitution.clone()))?;
                Ok(Converted {
                    expr: Expression::Conditional(ConditionalExpr {
                        test: Box::new(test.expr),
                        if_true: Box::new(if_true.expr),
                        if_false: Box::new(if_false.expr),
                        data_type,
                    }),
                    rooted,
                    substitution,
                })
            }

            Expression::Call(c) => {
                let instance = match &c.instance {
                    Some(instance) => Some(self.child(PathSegment::Instance, instance)?),
                    None => None,
                };
                let mut substitution = instance.as_ref().and_then(|i| i.substitution.clone());
                let mut arguments = Vec::with_capacity(c.arguments.len());
                // (source, target) element types of converted list arguments
                let mut elements: Vec<(DataType, DataType)> = Vec::new();
                for (index, argument) in c.arguments.iter().enumerate() {
                    self.path.push(PathSegment::Argument(index));
                    let converted = match argument {
                        Expression::Lambda(l) => self.visit_lambda(l, &elements, substitution.clone()),
                        _ => self.visit(argument),
                    };
                    self.path.pop();
                    let converted = converted?;
                    if converted.rooted {
                        let source = argument.data_type();
                        let target = converted.expr.data_type();
                        if let (Some(s), Some(t)) = (source.element_type(), target.element_type()) {
                            elements.push((s.clone(), t.clone()));
                        }
                    }
                    substitution = substitution.or(converted.substitution);
                    arguments.push(converted.expr);
                }

                let instance = instance.map(|i| i.expr);
                let instance_type = instance.as_ref().map(Expression::data_type);
                let argument_types: Vec<DataType> = arguments.iter().map(Expression::data_type).collect();
                self.rules
                    .call(&c.method, instance_type.as_ref(), &argument_types)
                    .map_err(|kind| self.retype_failed(kind, substitution.clone()))?;

                Ok(Converted {
                    expr: Expression::Call(CallExpr {
                        method: c.method.clone(),
                        instance: instance.map(Box::new),
                        arguments,
                    }),
                    rooted: false,
                    substitution,
                })
            }

            Expression::Lambda(l) => self.visit_lambda(l, &[], None),
        }
    }

    /// Rewrite a nested lambda
    ///
    /// A record-typed parameter takes the target element type of the list it
    /// ranges over, looked up in `elements`, and is bound as substituted so
    /// reads through it are redirected too. Parameters of other types keep
    /// their type.
    fn visit_lambda(
        &mut self,
        l: &Lambda,
        elements: &[(DataType, DataType)],
        substitution: Option<Substitution>,
    ) -> ConvertResult<Converted> {
        let mut bindings = Vec::with_capacity(l.parameters.len());
        for p in &l.parameters {
            let binding = if p.data_type.type_name().is_none() {
                Binding {
                    original: p.clone(),
                    replacement: p.clone(),
                    substituted: false,
                }
            } else {
                let Some((_, target)) = elements.iter().find(|(source, _)| *source == p.data_type) else {
                    let reason = format!("no target type for parameter '{}' of type {}", p.name, p.data_type);
                    return Err(match substitution {
                        Some(sub) => sub.incompatible(reason, &self.path),
                        None => ConvertError::malformed(reason, &self.path),
                    });
                };
                Binding {
                    original: p.clone(),
                    replacement: ParameterExpr::new(p.name.clone(), target.clone()),
                    substituted: true,
                }
            };
            bindings.push(binding);
        }

        let parameters: Vec<ParameterExpr> = bindings.iter().map(|b| b.replacement.clone()).collect();
        let depth = self.scope.len();
        self.scope.extend(bindings);
        let body = self.child(PathSegment::Body, &l.body);
        self.scope.truncate(depth);
        let body = body?;
        Ok(Converted {
            expr: Expression::Lambda(Lambda::new(parameters, body.expr)),
            rooted: false,
            substitution: body.substitution,
        })
    }

    /// Redirect a member read on the substituted parameter, or on a record
    /// reached from it, to the corresponding target member
    fn redirect_member(&self, m: &MemberExpr, target: Converted) -> ConvertResult<Converted> {
        let target_type = target.expr.data_type();
        let Some(target_name) = target_type.type_name() else {
            let reason = format!("{} is not a record type", target_type);
            return Err(match target.substitution {
                Some(sub) => sub.incompatible(reason, &self.path),
                None => ConvertError::malformed(reason, &self.path),
            });
        };

        let map = self
            .converter
            .member_map(&m.declaring_type, target_name)
            .map_err(|err| match err {
                ConvertError::UnknownType { name } => {
                    ConvertError::malformed(format!("unknown type {}", name), &self.path)
                }
                other => other,
            })?;

        let resolved = map.get(&m.member).ok_or_else(|| ConvertError::UnmappedMember {
            source_type: m.declaring_type.clone(),
            member: m.member.clone(),
            target_type: target_name.to_string(),
            path: self.path.clone(),
        })?;

        let substitution = Substitution {
            source_type: m.declaring_type.clone(),
            member: m.member.clone(),
            target_type: target_name.to_string(),
            target_member: resolved.name.clone(),
        };
        if !self.coercer.can_substitute(&m.data_type, &resolved.data_type) {
            return Err(substitution.incompatible(
                format!("{} cannot stand in for {}", resolved.data_type, m.data_type),
                &self.path,
            ));
        }

        trace!(
            "{}.{} -> {}.{} at {}",
            m.declaring_type, m.member, target_name, resolved.name, self.path
        );

        Ok(Converted {
            expr: Expression::Member(MemberExpr {
                target: Box::new(target.expr),
                member: resolved.name.clone(),
                declaring_type: target_name.to_string(),
                data_type: resolved.data_type.clone(),
            }),
            rooted: true,
            substitution: target.substitution.or(Some(substitution)),
        })
    }
}

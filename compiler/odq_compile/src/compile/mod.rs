//! Node-to-expression compiler.
//!
//! Walks a query tree and emits a typed [`Expr`] graph. Function calls are
//! resolved against a [`FunctionRegistry`]: each candidate mapping is tried
//! in registration order, and the first one whose arguments type-check
//! produces the call. Generic members are instantiated by matching their
//! signatures against the compiled argument types.
//!
//! # Scopes
//!
//! A compilation starts with a receiver parameter (`this`) and a set of
//! lambda parameters. Each lambda in the query opens a child [`Scope`] that
//! chains to its parent, so inner parameters shadow outer ones and
//! everything enclosing stays visible.
//!
//! # Failure
//!
//! Candidate rejection is local: a mapping whose receiver or arguments do
//! not fit yields `Ok(None)` and the loop moves on. Errors (`Err`) abort the
//! whole compilation.

mod binary;
mod call;
mod literal;

use std::cell::Cell;

use odq_ir::{BinaryOperator, Node};
use odq_types::{find_instance, Member, Type, TypeCtor};

use crate::resolve::ResolverHierarchy;
use crate::stack::ensure_sufficient_stack;
use crate::{host, CompileError, Expr, FunctionRegistry, Param, TypeResolver, Value};

/// Name of the receiver parameter in compiled predicates.
pub const THIS_PARAM: &str = "_this";

/// Compiles query trees against a registry and a type resolver.
///
/// Holds only shared references; one compiler can serve any number of
/// compilations.
pub struct QueryCompiler<'a> {
    registry: &'a FunctionRegistry,
    resolver: &'a dyn TypeResolver,
}

impl<'a> QueryCompiler<'a> {
    pub fn new(registry: &'a FunctionRegistry, resolver: &'a dyn TypeResolver) -> Self {
        Self { registry, resolver }
    }

    /// Compile `node` into a predicate lambda `_this => node` over `this_ty`.
    #[tracing::instrument(level = "debug", skip_all, fields(this = %this_ty, query = %node))]
    pub fn compile_predicate(&self, this_ty: &Type, node: &Node) -> Result<Expr, CompileError> {
        let this = Param::new(0, THIS_PARAM, this_ty.clone());
        self.compile(node, &this, std::slice::from_ref(&this), &[])
    }

    /// Compile `node` into a lambda over `lambda_params`.
    ///
    /// Symbols resolve against `lambda_params` and `outer`, and otherwise
    /// as properties of `this`. `this` may be one of `lambda_params`. New
    /// parameters get ids above every id passed in.
    #[tracing::instrument(level = "debug", skip_all, fields(query = %node))]
    pub fn compile(
        &self,
        node: &Node,
        this: &Param,
        lambda_params: &[Param],
        outer: &[Param],
    ) -> Result<Expr, CompileError> {
        let next_id = std::iter::once(this)
            .chain(lambda_params)
            .chain(outer)
            .map(|param| param.id.0 + 1)
            .max()
            .unwrap_or(0);
        let compilation = Compilation {
            registry: self.registry,
            resolver: self.resolver,
            hierarchy: ResolverHierarchy::new(self.resolver),
            this: Expr::parameter(this),
            next_id: Cell::new(next_id),
        };

        let visible: Vec<Param> = lambda_params
            .iter()
            .filter(|param| param.id != this.id)
            .chain(outer)
            .cloned()
            .collect();
        let scope = Scope::root(&visible);
        let body = compilation.compile_node(&scope, node, None, None)?;
        tracing::debug!(ty = %body.ty, "compiled");
        Ok(Expr::lambda(lambda_params.to_vec(), body))
    }
}

/// Parameters visible at one lambda nesting level.
pub(crate) struct Scope<'s> {
    params: &'s [Param],
    parent: Option<&'s Scope<'s>>,
    depth: usize,
}

impl<'s> Scope<'s> {
    fn root(params: &'s [Param]) -> Self {
        Self {
            params,
            parent: None,
            depth: 0,
        }
    }

    fn child(&'s self, params: &'s [Param]) -> Scope<'s> {
        Scope {
            params,
            parent: Some(self),
            depth: self.depth + 1,
        }
    }

    /// Innermost parameter called `name`.
    fn lookup(&self, name: &str) -> Option<&'s Param> {
        self.params
            .iter()
            .find(|param| param.name == name)
            .or_else(|| self.parent.and_then(|parent| parent.lookup(name)))
    }
}

/// State of one compilation.
pub(crate) struct Compilation<'a> {
    registry: &'a FunctionRegistry,
    resolver: &'a dyn TypeResolver,
    hierarchy: ResolverHierarchy<'a>,
    this: Expr,
    next_id: Cell<u32>,
}

impl Compilation<'_> {
    fn fresh_param(&self, name: &str, ty: Type) -> Param {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Param::new(id, name, ty)
    }

    /// Compile `node`.
    ///
    /// `receiver` is the expression a symbol or indexer is a member of;
    /// `None` means `this`. `expected` is the type the surrounding construct
    /// wants, used for literal coercion and lambda parameter typing.
    pub(crate) fn compile_node(
        &self,
        scope: &Scope<'_>,
        node: &Node,
        receiver: Option<&Expr>,
        expected: Option<&Type>,
    ) -> Result<Expr, CompileError> {
        ensure_sufficient_stack(|| self.compile_node_inner(scope, node, receiver, expected))
    }

    #[tracing::instrument(level = "trace", skip_all, fields(node = node.kind_name(), depth = scope.depth))]
    fn compile_node_inner(
        &self,
        scope: &Scope<'_>,
        node: &Node,
        receiver: Option<&Expr>,
        expected: Option<&Type>,
    ) -> Result<Expr, CompileError> {
        match node {
            Node::Symbol(name) => self.compile_symbol(scope, name, receiver),
            Node::IndexerAccess { name, args } => self.compile_indexer(scope, name, args, receiver),
            Node::Binary {
                op: BinaryOperator::Dot,
                left,
                right,
            } => self.compile_dot(scope, left, right, receiver),
            _ if receiver.is_some() => Err(CompileError::unsupported(format!(
                "{} cannot follow `.`",
                node.kind_name()
            ))),
            Node::Binary { op, left, right } => self.compile_binary(scope, *op, left, right),
            Node::MethodCall { name, args } => self.compile_call(scope, name, args),
            Node::Lambda { params, body } => self.compile_lambda(scope, params, body, expected),
            Node::Array(items) => self.compile_array(scope, items, expected),
            Node::String(value) => Ok(Expr::constant(Value::String(value.clone()))),
            Node::Number(text) => self.compile_number(text, expected),
            Node::Guid(value) => Ok(Expr::constant(Value::Guid(*value))),
            Node::DateTime(value) => Ok(Expr::constant(Value::DateTime(*value))),
        }
    }

    fn compile_symbol(
        &self,
        scope: &Scope<'_>,
        name: &str,
        receiver: Option<&Expr>,
    ) -> Result<Expr, CompileError> {
        let receiver = match receiver {
            Some(receiver) => receiver,
            None => {
                match name {
                    "this" => return Ok(self.this.clone()),
                    "true" => return Ok(Expr::constant(Value::Bool(true))),
                    "false" => return Ok(Expr::constant(Value::Bool(false))),
                    "null" => return Ok(Expr::constant(Value::Null)),
                    _ => {}
                }
                if let Some(param) = scope.lookup(name) {
                    return Ok(Expr::parameter(param));
                }
                &self.this
            }
        };
        self.resolver
            .resolve_property(receiver, name)
            .ok_or_else(|| CompileError::UnknownSymbol {
                name: name.to_string(),
                on: receiver.ty.clone(),
            })
    }

    /// `left.right`.
    ///
    /// A method call on the right becomes a call with `left` prepended to
    /// its arguments, so `a.f(b)` compiles exactly like `f(a, b)`.
    fn compile_dot(
        &self,
        scope: &Scope<'_>,
        left: &Node,
        right: &Node,
        receiver: Option<&Expr>,
    ) -> Result<Expr, CompileError> {
        if let Node::MethodCall { name, args } = right {
            if receiver.is_some() {
                return Err(CompileError::unsupported(format!(
                    "method `{name}` called on a nested member path"
                )));
            }
            let args: Vec<Node> = std::iter::once(left.clone()).chain(args.iter().cloned()).collect();
            return self.compile_call(scope, name, &args);
        }
        let left = self.compile_node(scope, left, receiver, None)?;
        self.compile_node(scope, right, Some(&left), None)
    }

    /// `name[key]` on a string-keyed dictionary property.
    fn compile_indexer(
        &self,
        scope: &Scope<'_>,
        name: &str,
        args: &[Node],
        receiver: Option<&Expr>,
    ) -> Result<Expr, CompileError> {
        let dictionary = self.compile_symbol(scope, name, Some(receiver.unwrap_or(&self.this)))?;
        let value_ty = match find_instance(TypeCtor::Dictionary, &dictionary.ty, &self.hierarchy).as_deref() {
            Some([Type::String, value]) => value.clone(),
            _ => {
                return Err(CompileError::unsupported(format!(
                    "indexer on `{name}` of type {}; only string-keyed dictionaries are indexable",
                    dictionary.ty
                )))
            }
        };
        let [key] = args else {
            return Err(CompileError::ArgumentCountMismatch {
                function: format!("{name}[]"),
                expected: "1".to_string(),
                found: args.len(),
            });
        };
        let key = self.compile_node(scope, key, None, Some(&Type::String))?;
        if key.ty != Type::String {
            return Err(CompileError::type_mismatch(format!(
                "dictionary key must be String, found {}",
                key.ty
            )));
        }
        let member = Member::instantiate(
            host::dictionary_get(),
            &[Type::String, value_ty],
            &[],
        );
        Ok(Expr::call(Some(dictionary), member, vec![key]))
    }

    /// `x:body` against the function type the call site expects.
    fn compile_lambda(
        &self,
        scope: &Scope<'_>,
        names: &[String],
        body: &Node,
        expected: Option<&Type>,
    ) -> Result<Expr, CompileError> {
        let (params, ret) = match expected {
            Some(Type::Quoted(inner)) => {
                let lambda = self.compile_lambda(scope, names, body, Some(inner))?;
                return Ok(Expr::quote(lambda));
            }
            Some(Type::Function { params, ret }) => (params, ret),
            Some(other) => {
                return Err(CompileError::type_mismatch(format!(
                    "lambda used where {other} is expected"
                )))
            }
            None => {
                return Err(CompileError::type_mismatch(
                    "lambda used where no function type is expected",
                ))
            }
        };
        if params.len() != names.len() {
            return Err(CompileError::type_mismatch(format!(
                "lambda takes {} parameter(s) but {} are expected",
                names.len(),
                params.len()
            )));
        }
        if params.iter().any(Type::has_params) {
            return Err(CompileError::type_mismatch(
                "unable to infer lambda parameter types",
            ));
        }

        let lambda_params: Vec<Param> = names
            .iter()
            .zip(params)
            .map(|(name, ty)| self.fresh_param(name, ty.clone()))
            .collect();
        let inner = scope.child(&lambda_params);
        let body_expected = (!ret.has_params()).then_some(&**ret);
        let body = self.compile_node(&inner, body, None, body_expected)?;
        Ok(Expr::lambda(lambda_params, body))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;

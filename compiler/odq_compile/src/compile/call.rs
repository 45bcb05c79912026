//! Function calls: `isof`, `cast`, and registry-resolved members.

use odq_ir::Node;
use odq_types::{is_convertible, MemberKind, Type, TypeArgs, Unifier};

use super::{Compilation, Scope};
use crate::registry::MemberMapping;
use crate::{CompileError, Expr};

impl Compilation<'_> {
    pub(super) fn compile_call(
        &self,
        scope: &Scope<'_>,
        name: &str,
        args: &[Node],
    ) -> Result<Expr, CompileError> {
        if matches!(name, "isof" | "cast") {
            return self.compile_type_operator(scope, name, args);
        }

        for mapping in self.registry.candidates(name, args.len()) {
            if let Some(call) = self.try_mapping(scope, mapping, args)? {
                return Ok(call);
            }
        }
        Err(CompileError::UnknownFunction {
            name: name.to_string(),
            arity: args.len(),
        })
    }

    /// Compile `args` against one candidate.
    ///
    /// Returns `Ok(None)` if the receiver or an argument does not fit the
    /// member's signature.
    #[tracing::instrument(level = "trace", skip_all, fields(member = %mapping.member()))]
    fn try_mapping(
        &self,
        scope: &Scope<'_>,
        mapping: &MemberMapping,
        args: &[Node],
    ) -> Result<Option<Expr>, CompileError> {
        let Some(native) = mapping.reorder(args) else {
            return Ok(None);
        };
        let unifier = Unifier::new(&self.hierarchy);
        let mut member = mapping.member().clone();
        let mut params = native.as_slice();

        let receiver = if member.has_receiver() {
            let Some((&first, rest)) = params.split_first() else {
                return Ok(None);
            };
            params = rest;
            let declaring = member.template().declaring.clone();
            let expected = (!declaring.has_params()).then_some(&declaring);
            let receiver = self.compile_node(scope, first, None, expected)?;
            member = match unifier.bind_declaring(&member, &receiver.ty) {
                Ok(bound) => bound,
                Err(error) => {
                    tracing::trace!(%error, "receiver rejected");
                    return Ok(None);
                }
            };
            Some(receiver)
        } else {
            None
        };

        if member.kind() == MemberKind::Property {
            return Ok(receiver.map(|receiver| Expr::member_access(receiver, member)));
        }

        let mut bindings = TypeArgs::for_member(&member);
        let mut compiled = Vec::with_capacity(params.len());
        for (index, (&node, wanted)) in params.iter().zip(&member.template().params).enumerate() {
            let expected = bindings.resolve(wanted);
            let arg = self.compile_node(scope, node, None, Some(&expected))?;
            match unifier.infer(wanted, &arg.ty, &mut bindings) {
                Ok(true) => tracing::trace!(index, ty = %arg.ty, "argument bound type parameters"),
                Ok(false) => {}
                Err(error) => {
                    tracing::trace!(index, %error, "argument rejected");
                    return Ok(None);
                }
            }
            compiled.push(arg);
        }

        let member = bindings.instantiate(&member);
        if member.has_open_declaring() || member.has_open_method() {
            tracing::trace!(%member, "type arguments not inferable");
            return Ok(None);
        }
        tracing::debug!(%member, "resolved call");
        Ok(Some(Expr::call(receiver, member, compiled)))
    }

    /// `isof(T)`, `isof(x, T)`, `cast(T)`, `cast(x, T)`.
    ///
    /// The one-argument forms apply to `this`. The type may be written as a
    /// bare name or a string.
    fn compile_type_operator(
        &self,
        scope: &Scope<'_>,
        name: &str,
        args: &[Node],
    ) -> Result<Expr, CompileError> {
        let (operand, type_node) = match args {
            [type_node] => (self.this.clone(), type_node),
            [operand, type_node] => (self.compile_node(scope, operand, None, None)?, type_node),
            _ => {
                return Err(CompileError::ArgumentCountMismatch {
                    function: name.to_string(),
                    expected: "1 or 2".to_string(),
                    found: args.len(),
                })
            }
        };
        let type_name = match type_node {
            Node::Symbol(text) | Node::String(text) => text,
            other => {
                return Err(CompileError::unsupported(format!(
                    "`{name}` expects a type name, found {}",
                    other.kind_name()
                )))
            }
        };
        let target: Type = self
            .resolver
            .resolve_type(type_name)
            .ok_or_else(|| CompileError::UnknownType {
                name: type_name.clone(),
            })?;

        if name == "isof" {
            return Ok(Expr::type_is(operand, target));
        }
        if !is_convertible(&target, &operand.ty, &self.hierarchy) {
            return Err(CompileError::type_mismatch(format!(
                "cannot cast {} to {target}",
                operand.ty
            )));
        }
        Ok(Expr::convert(operand, target, true))
    }
}

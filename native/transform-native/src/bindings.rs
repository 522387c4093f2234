//! Binding resolution.
//!
//! Given a declarator whose initializer evaluates to a tracked value (or an
//! ancestor of it), works out which identifiers end up bound to what is
//! left of the path.

use oxc_ast::ast::*;
use oxc_ast::AstKind;
use oxc_semantic::AstNodes;
use oxc_span::Span;
use oxc_syntax::node::NodeId;
use oxc_syntax::symbol::SymbolId;

use crate::path::PropertyPath;

/// An identifier binding and what is left of the path below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedReference {
    pub symbol: SymbolId,
    pub path: PropertyPath,
}

/// A tracked value bound by anything other than `let`/`const`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedDeclaration {
    pub kind: String,
    pub span: Span,
}

pub fn resolve_declarator(
    nodes: &AstNodes<'_>,
    declarator: NodeId,
    path: &PropertyPath,
) -> Result<Vec<TrackedReference>, UnsupportedDeclaration> {
    let AstKind::VariableDeclarator(declarator_node) = nodes.get_node(declarator).kind() else {
        return Ok(Vec::new());
    };

    let (kind, declare, span) = match nodes.get_node(nodes.parent_id(declarator)).kind() {
        AstKind::VariableDeclaration(declaration) => {
            (declaration.kind, declaration.declare, declaration.span)
        }
        _ => (declarator_node.kind, false, declarator_node.span),
    };

    let block_scoped = matches!(
        kind,
        VariableDeclarationKind::Let | VariableDeclarationKind::Const
    );
    if declare || !block_scoped {
        let kind = if declare {
            format!("declare {}", kind.as_str())
        } else {
            kind.as_str().to_string()
        };
        return Err(UnsupportedDeclaration { kind, span });
    }

    let mut bound = Vec::new();
    resolve_pattern(&declarator_node.id, path, &mut bound);
    Ok(bound)
}

pub fn resolve_pattern(
    pattern: &BindingPattern<'_>,
    path: &PropertyPath,
    bound: &mut Vec<TrackedReference>,
) {
    match pattern {
        BindingPattern::BindingIdentifier(id) => bind(id, path.clone(), bound),
        BindingPattern::ObjectPattern(object) => resolve_object_pattern(object, path, bound),
        // array destructuring is not tracked
        _ => {}
    }
}

/// Properties are tried left to right. A named segment is claimed by the
/// first matching property; a wildcard is offered to every property.
/// A rest element keeps the whole remaining path unless a named segment
/// was already claimed.
fn resolve_object_pattern(
    pattern: &ObjectPattern<'_>,
    path: &PropertyPath,
    bound: &mut Vec<TrackedReference>,
) {
    if let Some(segment) = path.next_segment() {
        for property in &pattern.properties {
            if property.computed {
                continue;
            }
            let Some(key) = static_key(&property.key) else {
                continue;
            };
            if !segment.matches(key) {
                continue;
            }

            let below = path.without_next();
            match &property.value {
                BindingPattern::BindingIdentifier(id) => bind(id, below, bound),
                BindingPattern::ObjectPattern(inner) => {
                    resolve_object_pattern(inner, &below, bound)
                }
                _ => {}
            }

            if !segment.is_any() {
                return;
            }
        }
    }

    if let Some(rest) = &pattern.rest {
        if let BindingPattern::BindingIdentifier(id) = &rest.argument {
            bind(id, path.clone(), bound);
        }
    }
}

fn static_key<'b>(key: &'b PropertyKey<'_>) -> Option<&'b str> {
    match key {
        PropertyKey::StaticIdentifier(id) => Some(id.name.as_str()),
        PropertyKey::StringLiteral(literal) => Some(literal.value.as_str()),
        _ => None,
    }
}

fn bind(id: &BindingIdentifier<'_>, path: PropertyPath, bound: &mut Vec<TrackedReference>) {
    if let Some(symbol) = id.symbol_id.get() {
        bound.push(TrackedReference { symbol, path });
    }
}

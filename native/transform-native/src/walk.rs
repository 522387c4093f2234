//! Path-tracking primitives.
//!
//! Starting from a node that references a tracked value, these walk upward
//! through property accesses (or a JSX tag's member chain) while each
//! property matches the next pending segment of a [`PropertyPath`].

use std::collections::HashMap;

use oxc_ast::ast::*;
use oxc_ast::AstKind;
use oxc_ast_visit::{walk, Visit};
use oxc_semantic::AstNodes;
use oxc_span::{GetSpan, Span};
use oxc_syntax::node::NodeId;
use oxc_syntax::reference::ReferenceId;

use crate::path::PropertyPath;

// ═══════════════════════════════════════════════════════════════════════════════
// EXPRESSION CHAINS
// ═══════════════════════════════════════════════════════════════════════════════

/// Where a walk up a property-access chain stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainWalk {
    /// Path fully consumed. `value` evaluates to the tracked value and
    /// `user` is the first non-wrapper node consuming it.
    Value { value: NodeId, user: NodeId },
    /// The chain ended with segments still pending: `value` evaluates to an
    /// ancestor of the tracked value, not the value itself.
    Ancestor { value: NodeId, user: NodeId },
    /// The chain took a different property, or went deeper than the value.
    Unrelated,
}

/// A computed property access whose key is not a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicMemberAccess {
    pub span: Span,
}

/// Consumes `path` one segment per matching property access above `start`.
///
/// Type-only wrappers (`as`, `satisfies`, `<T>x`, `x!`, parentheses) are
/// skipped on the way up and never count as uses.
pub fn walk_member_chain(
    nodes: &AstNodes<'_>,
    start: NodeId,
    path: &mut PropertyPath,
) -> Result<ChainWalk, DynamicMemberAccess> {
    let (mut value, mut user) = climb_wrappers(nodes, start);

    loop {
        let value_span = node_span(nodes, value);
        let property = match nodes.get_node(user).kind() {
            AstKind::StaticMemberExpression(member) if member.object.span() == value_span => {
                Some((Some(member.property.name.as_str()), member.span))
            }
            AstKind::ComputedMemberExpression(member) if member.object.span() == value_span => {
                Some((computed_key(member), member.span))
            }
            _ => None,
        };

        let Some((property, access_span)) = property else {
            return Ok(if path.is_empty() {
                ChainWalk::Value { value, user }
            } else {
                ChainWalk::Ancestor { value, user }
            });
        };

        let Some(segment) = path.next_segment() else {
            // deeper than the value
            return Ok(ChainWalk::Unrelated);
        };

        let Some(property) = property else {
            return Err(DynamicMemberAccess { span: access_span });
        };

        if !segment.matches(property) {
            return Ok(ChainWalk::Unrelated);
        }

        path.consume();
        (value, user) = climb_wrappers(nodes, user);
    }
}

fn computed_key<'b>(member: &'b ComputedMemberExpression<'_>) -> Option<&'b str> {
    match &member.expression {
        Expression::StringLiteral(key) => Some(key.value.as_str()),
        _ => None,
    }
}

/// Climbs from `start` past transparent wrappers. Returns the outermost
/// wrapper (or `start` itself) and its parent.
pub fn climb_wrappers(nodes: &AstNodes<'_>, start: NodeId) -> (NodeId, NodeId) {
    let mut value = start;
    loop {
        let parent = nodes.parent_id(value);
        if parent == value || !is_transparent_wrapper(&nodes.get_node(parent).kind()) {
            return (value, parent);
        }
        value = parent;
    }
}

pub fn is_transparent_wrapper(kind: &AstKind<'_>) -> bool {
    matches!(
        kind,
        AstKind::ParenthesizedExpression(_)
            | AstKind::TSAsExpression(_)
            | AstKind::TSSatisfiesExpression(_)
            | AstKind::TSTypeAssertion(_)
            | AstKind::TSNonNullExpression(_)
            | AstKind::TSInstantiationExpression(_)
    )
}

pub fn node_span(nodes: &AstNodes<'_>, id: NodeId) -> Span {
    nodes.get_node(id).kind().span()
}

/// `typeof x` in a type position reads the binding's type, not its value.
pub fn is_type_query_operand(nodes: &AstNodes<'_>, id: NodeId) -> bool {
    let mut current = id;
    for _ in 0..3 {
        let parent = nodes.parent_id(current);
        if parent == current {
            return false;
        }
        if matches!(nodes.get_node(parent).kind(), AstKind::TSTypeQuery(_)) {
            return true;
        }
        current = parent;
    }
    false
}

/// Name of a syntactic construct for "used inside ..." messages.
pub fn construct_name(kind: &AstKind<'_>) -> &'static str {
    match kind {
        AstKind::CallExpression(_) => "CallExpression",
        AstKind::NewExpression(_) => "NewExpression",
        AstKind::BinaryExpression(_) => "BinaryExpression",
        AstKind::LogicalExpression(_) => "LogicalExpression",
        AstKind::UnaryExpression(_) => "UnaryExpression",
        AstKind::UpdateExpression(_) => "UpdateExpression",
        AstKind::ConditionalExpression(_) => "ConditionalExpression",
        AstKind::AssignmentExpression(_) => "AssignmentExpression",
        AstKind::SequenceExpression(_) => "SequenceExpression",
        AstKind::ArrayExpression(_) => "ArrayExpression",
        AstKind::ObjectProperty(_) => "ObjectProperty",
        AstKind::SpreadElement(_) => "SpreadElement",
        AstKind::TemplateLiteral(_) => "TemplateLiteral",
        AstKind::TaggedTemplateExpression(_) => "TaggedTemplateExpression",
        AstKind::AwaitExpression(_) => "AwaitExpression",
        AstKind::YieldExpression(_) => "YieldExpression",
        AstKind::ChainExpression(_) => "ChainExpression",
        AstKind::ArrowFunctionExpression(_) => "ArrowFunctionExpression",
        AstKind::ReturnStatement(_) => "ReturnStatement",
        AstKind::IfStatement(_) => "IfStatement",
        AstKind::JSXExpressionContainer(_) => "JSXExpressionContainer",
        AstKind::ExportSpecifier(_) => "ExportSpecifier",
        AstKind::ExportDefaultDeclaration(_) => "ExportDefaultDeclaration",
        _ => "an unsupported expression",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSX TAG CHAINS
// ═══════════════════════════════════════════════════════════════════════════════

/// A JSX tag name whose root identifier is a resolved reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsxTagUse {
    /// Span of the whole element the tag belongs to.
    pub element: Span,
    /// Properties after the root identifier, in source order: `a.b.c` → `[b, c]`.
    pub properties: Vec<String>,
    pub closing: bool,
}

/// Lookup from a tag's root reference to the tag it appears in.
#[derive(Debug, Default)]
pub struct JsxTagIndex {
    tags: HashMap<ReferenceId, JsxTagUse>,
}

impl JsxTagIndex {
    /// Must run after semantic analysis has assigned reference ids.
    pub fn build(program: &Program<'_>) -> Self {
        let mut index = Self::default();
        index.visit_program(program);
        index
    }

    pub fn get(&self, reference: ReferenceId) -> Option<&JsxTagUse> {
        self.tags.get(&reference)
    }

    fn record(&mut self, name: &JSXElementName<'_>, element: Span, closing: bool) {
        let (root, properties) = match name {
            JSXElementName::IdentifierReference(id) => (id, Vec::new()),
            JSXElementName::MemberExpression(member) => {
                let mut properties = Vec::new();
                let mut current = member;
                let root = loop {
                    properties.push(current.property.name.to_string());
                    match &current.object {
                        JSXMemberExpressionObject::IdentifierReference(id) => break id,
                        JSXMemberExpressionObject::MemberExpression(inner) => current = inner,
                        JSXMemberExpressionObject::ThisExpression(_) => return,
                    }
                };
                properties.reverse();
                (root, properties)
            }
            _ => return,
        };

        if let Some(reference) = root.reference_id.get() {
            self.tags.insert(
                reference,
                JsxTagUse {
                    element,
                    properties,
                    closing,
                },
            );
        }
    }
}

impl<'a> Visit<'a> for JsxTagIndex {
    fn visit_jsx_element(&mut self, element: &JSXElement<'a>) {
        self.record(&element.opening_element.name, element.span, false);
        if let Some(closing) = &element.closing_element {
            self.record(&closing.name, element.span, true);
        }
        walk::walk_jsx_element(self, element);
    }
}

/// JSX counterpart of [`walk_member_chain`]. Returns the element span when
/// the tag's member chain consumes the whole path on an opening tag.
pub fn match_jsx_tag(tag: &JsxTagUse, path: &mut PropertyPath) -> Option<Span> {
    for property in &tag.properties {
        let segment = path.next_segment()?;
        if !segment.matches(property) {
            return None;
        }
        path.consume();
    }

    if !path.is_empty() || tag.closing {
        return None;
    }
    Some(tag.element)
}

//! Slot Element Lowering
//!
//! Rewrites every recorded slot element into a call on its accessor:
//! `<slot.default a="x">hi</slot.default>` becomes
//! `slot.default(<default-content-wrapper>hi</default-content-wrapper>, { a: "x" })`.

use oxc_allocator::{Allocator, Box as oxc_box, CloneIn, Vec as ArenaVec};
use oxc_ast::ast::*;
use oxc_ast::AstBuilder;
use oxc_ast_visit::walk_mut::{walk_expression, walk_jsx_attribute_value, walk_jsx_child};
use oxc_ast_visit::VisitMut;
use oxc_parser::Parser;
use oxc_span::{SourceType, SPAN};
use oxc_syntax::identifier::is_identifier_name;
use tracing::warn;

use crate::constants::DEFAULT_CONTENT_WRAPPER;
use crate::discovery::SlotElements;
use crate::error::{SlotError, SlotErrorKind, TransformError};
use crate::source::SourceFile;

// ═══════════════════════════════════════════════════════════════════════════════
// SLOT LOWERER
// Replaces recorded JSX elements with accessor calls, innermost first
// ═══════════════════════════════════════════════════════════════════════════════

pub struct SlotLowerer<'a, 's> {
    pub ast: AstBuilder<'a>,
    pending: SlotElements,
    source: SourceFile<'s>,
    lowered: usize,
    error: Option<TransformError>,
}

impl<'a, 's> SlotLowerer<'a, 's> {
    pub fn new(allocator: &'a Allocator, pending: SlotElements, source: SourceFile<'s>) -> Self {
        Self {
            ast: AstBuilder::new(allocator),
            pending,
            source,
            lowered: 0,
            error: None,
        }
    }

    /// Lowers every pending element in `program`. Returns how many were rewritten.
    pub fn lower_program(mut self, program: &mut Program<'a>) -> Result<usize, TransformError> {
        self.visit_program(program);
        if let Some(error) = self.error {
            return Err(error);
        }
        if !self.pending.is_empty() {
            warn!(
                file = self.source.name,
                remaining = self.pending.len(),
                "slot elements were recorded but never reached"
            );
        }
        Ok(self.lowered)
    }

    /// Lowers `element` if it is still pending. Each record is taken exactly
    /// once, so revisiting a node never rewrites it twice.
    fn take_pending(&mut self, element: &mut JSXElement<'a>) -> Option<Expression<'a>> {
        if self.error.is_some() || !self.pending.take(element.span) {
            return None;
        }
        match self.lower_element(element) {
            Ok(call) => {
                self.lowered += 1;
                Some(call)
            }
            Err(error) => {
                self.error = Some(error);
                None
            }
        }
    }

    fn lower_element(&mut self, element: &mut JSXElement<'a>) -> Result<Expression<'a>, TransformError> {
        let callee = self.tag_to_callee(&element.opening_element.name)?;
        let props = self.attributes_to_object(&element.opening_element.attributes);
        let children = std::mem::replace(&mut element.children, self.ast.vec());
        let content = self.default_content(children)?;

        let mut arguments = self.ast.vec();
        arguments.push(Argument::from(content));
        if let Some(props) = props {
            arguments.push(Argument::from(props));
        }

        Ok(self.ast.expression_call(
            element.span,
            callee,
            None::<oxc_box<TSTypeParameterInstantiation>>,
            arguments,
            false,
        ))
    }

    fn attributes_to_object(
        &self,
        attributes: &ArenaVec<'a, JSXAttributeItem<'a>>,
    ) -> Option<Expression<'a>> {
        if attributes.is_empty() {
            return None;
        }

        let mut properties = self.ast.vec();
        for item in attributes {
            match item {
                JSXAttributeItem::Attribute(attr) => {
                    properties.push(self.ast.object_property_kind_object_property(
                        SPAN,
                        PropertyKind::Init,
                        self.attribute_key(&attr.name),
                        self.attribute_value(&attr.value),
                        false,
                        false,
                        false,
                    ));
                }
                JSXAttributeItem::SpreadAttribute(spread) => {
                    properties.push(self.ast.object_property_kind_spread_property(
                        SPAN,
                        spread.argument.clone_in(self.ast.allocator),
                    ));
                }
            }
        }

        Some(self.ast.expression_object(SPAN, properties))
    }

    fn attribute_key(&self, name: &JSXAttributeName<'a>) -> PropertyKey<'a> {
        let name = match name {
            JSXAttributeName::Identifier(id) => id.name.to_string(),
            JSXAttributeName::NamespacedName(ns) => {
                format!("{}:{}", ns.namespace.name, ns.name.name)
            }
        };
        let name = self.ast.allocator.alloc_str(&name);

        // `slot-name` and `xlink:href` are valid JSX but not JS identifiers
        if is_identifier_name(name) {
            PropertyKey::StaticIdentifier(self.ast.alloc(self.ast.identifier_name(SPAN, name)))
        } else {
            PropertyKey::StringLiteral(self.ast.alloc(self.ast.string_literal(SPAN, name, None)))
        }
    }

    fn attribute_value(&self, value: &Option<JSXAttributeValue<'a>>) -> Expression<'a> {
        match value {
            None => self.ast.expression_boolean_literal(SPAN, true),
            // entities stay undecoded; `raw` is dropped so codegen quotes the value
            Some(JSXAttributeValue::StringLiteral(literal)) => {
                self.ast
                    .expression_string_literal(literal.span, literal.value.clone(), None)
            }
            Some(JSXAttributeValue::ExpressionContainer(container)) => container
                .expression
                .as_expression()
                .map(|e| e.clone_in(self.ast.allocator))
                .unwrap_or_else(|| self.ast.expression_identifier(SPAN, "undefined")),
            Some(JSXAttributeValue::Element(element)) => {
                Expression::JSXElement(element.clone_in(self.ast.allocator))
            }
            Some(JSXAttributeValue::Fragment(fragment)) => {
                Expression::JSXFragment(fragment.clone_in(self.ast.allocator))
            }
        }
    }

    fn tag_to_callee(&self, name: &JSXElementName<'a>) -> Result<Expression<'a>, TransformError> {
        match name {
            JSXElementName::IdentifierReference(id) => {
                Ok(self.ast.expression_identifier(id.span, id.name.clone()))
            }
            JSXElementName::Identifier(id) => {
                Ok(self.ast.expression_identifier(id.span, id.name.clone()))
            }
            JSXElementName::MemberExpression(member) => Ok(self.member_to_callee(member)),
            JSXElementName::ThisExpression(this) => Ok(self.ast.expression_this(this.span)),
            JSXElementName::NamespacedName(ns) => Err(SlotError::new(
                SlotErrorKind::NamespacedJsxName,
                format!(
                    "Unsupported syntax: Slottable elements can't use namespaced JSX names such as `{}:{}`.",
                    ns.namespace.name, ns.name.name
                ),
                &self.source,
                ns.span,
            )
            .into()),
        }
    }

    fn member_to_callee(&self, member: &JSXMemberExpression<'a>) -> Expression<'a> {
        let object = match &member.object {
            JSXMemberExpressionObject::IdentifierReference(id) => {
                self.ast.expression_identifier(id.span, id.name.clone())
            }
            JSXMemberExpressionObject::MemberExpression(inner) => self.member_to_callee(inner),
            JSXMemberExpressionObject::ThisExpression(this) => self.ast.expression_this(this.span),
        };

        Expression::from(self.ast.member_expression_static(
            member.span,
            object,
            self.ast
                .identifier_name(member.property.span, member.property.name.clone()),
            false,
        ))
    }

    /// `<default-content-wrapper />` for no children, otherwise a wrapper
    /// holding the original children.
    fn default_content(
        &self,
        children: ArenaVec<'a, JSXChild<'a>>,
    ) -> Result<Expression<'a>, TransformError> {
        let template = if children.is_empty() {
            format!("<{DEFAULT_CONTENT_WRAPPER} />")
        } else {
            format!("<{DEFAULT_CONTENT_WRAPPER}></{DEFAULT_CONTENT_WRAPPER}>")
        };
        let template = self.ast.allocator.alloc_str(&template);

        let mut wrapper = Parser::new(self.ast.allocator, template, SourceType::jsx())
            .parse_expression()
            .map_err(|errors| TransformError::Wrapper {
                file: self.source.name.to_string(),
                message: errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            })?;

        if let Expression::JSXElement(element) = &mut wrapper {
            element.children = children;
        }
        Ok(wrapper)
    }
}

impl<'a> VisitMut<'a> for SlotLowerer<'a, '_> {
    fn visit_expression(&mut self, expr: &mut Expression<'a>) {
        walk_expression(self, expr);
        if let Expression::JSXElement(element) = expr {
            if let Some(call) = self.take_pending(element) {
                *expr = call;
            }
        }
    }

    fn visit_jsx_child(&mut self, child: &mut JSXChild<'a>) {
        walk_jsx_child(self, child);
        if let JSXChild::Element(element) = child {
            let span = element.span;
            if let Some(call) = self.take_pending(element) {
                *child = self
                    .ast
                    .jsx_child_expression_container(span, JSXExpression::from(call));
            }
        }
    }

    fn visit_jsx_attribute_value(&mut self, value: &mut JSXAttributeValue<'a>) {
        walk_jsx_attribute_value(self, value);
        if let JSXAttributeValue::Element(element) = value {
            let span = element.span;
            if let Some(call) = self.take_pending(element) {
                *value = self
                    .ast
                    .jsx_attribute_value_expression_container(span, JSXExpression::from(call));
            }
        }
    }
}

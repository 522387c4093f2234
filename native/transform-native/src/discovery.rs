//! Call-site and slot-element discovery.
//!
//! Both phases follow the same machinery: walk each reference up its
//! property chain ([`walk_member_chain`]), then decide what the landing
//! site means. Declarators fan out into new tracked bindings through
//! [`resolve_declarator`]; anything the walk cannot model stops the file.

use std::collections::HashSet;

use oxc_ast::ast::*;
use oxc_ast::AstKind;
use oxc_semantic::{AstNodes, Semantic};
use oxc_span::{GetSpan, Span};
use oxc_syntax::node::NodeId;
use oxc_syntax::reference::ReferenceId;
use oxc_syntax::symbol::SymbolId;
use tracing::{debug, trace};

use crate::bindings::{resolve_declarator, TrackedReference, UnsupportedDeclaration};
use crate::constants::{IMPORTED_NODE, LIB_SOURCE, SLOT_OBJECT_NAME};
use crate::error::{SlotError, SlotErrorKind};
use crate::path::{PathSegment, PropertyPath};
use crate::source::SourceFile;
use crate::walk::{
    construct_name, is_type_query_operand, match_jsx_tag, node_span, walk_member_chain,
    ChainWalk, DynamicMemberAccess, JsxTagIndex,
};

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS
// ═══════════════════════════════════════════════════════════════════════════════

/// JSX elements proven to be slot accesses, keyed by the element's span.
#[derive(Debug, Clone, Default)]
pub struct SlotElements {
    spans: HashSet<Span>,
}

impl SlotElements {
    pub fn insert(&mut self, element: Span) -> bool {
        self.spans.insert(element)
    }

    /// Removes the record, returning whether it was pending.
    pub fn take(&mut self, element: Span) -> bool {
        self.spans.remove(&element)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Every import of the factory from the runtime library, under any alias.
/// Namespace imports start one property above the factory.
pub fn factory_imports(program: &Program<'_>) -> Vec<TrackedReference> {
    let mut imports = Vec::new();

    for statement in &program.body {
        let Statement::ImportDeclaration(import) = statement else {
            continue;
        };
        if import.source.value.as_str() != LIB_SOURCE || import.import_kind.is_type() {
            continue;
        }
        let Some(specifiers) = &import.specifiers else {
            continue;
        };

        for specifier in specifiers {
            let (local, path) = match specifier {
                ImportDeclarationSpecifier::ImportSpecifier(named) => {
                    if named.import_kind.is_type()
                        || named.imported.name().as_str() != IMPORTED_NODE
                    {
                        continue;
                    }
                    (&named.local, PropertyPath::empty())
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(namespace) => (
                    &namespace.local,
                    PropertyPath::new(vec![PathSegment::name(IMPORTED_NODE)]),
                ),
                ImportDeclarationSpecifier::ImportDefaultSpecifier(_) => continue,
            };

            if let Some(symbol) = local.symbol_id.get() {
                imports.push(TrackedReference { symbol, path });
            }
        }
    }

    imports
}

/// Span of the arrow function when `statement` is the implicit return of
/// an expression-bodied arrow (`() => value`).
fn concise_arrow(nodes: &AstNodes<'_>, statement: NodeId) -> Option<Span> {
    let body = nodes.parent_id(statement);
    if !matches!(nodes.get_node(body).kind(), AstKind::FunctionBody(_)) {
        return None;
    }
    match nodes.get_node(nodes.parent_id(body)).kind() {
        AstKind::ArrowFunctionExpression(arrow) if arrow.expression => Some(arrow.span),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DISCOVERY
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Factory,
    Slot,
}

impl Phase {
    fn member_access_message(self) -> &'static str {
        match self {
            Phase::Factory => "Unsupported syntax: Member expression accessing a `useSlot` value can only use dot notation or bracket notation (iff the value is a string literal). Allowed syntax is: `ReactSlots.useSlot` or `ReactSlots[\"useSlot\"]`.",
            Phase::Slot => "Unsupported syntax: Member expression accessing a slottable node can only use dot notation or bracket notation (iff the value is a string literal). eg: `useSlot().slot.default` or `useSlot()[\"slot\"].default`.",
        }
    }

    fn declaration_message(self, kind: &str) -> String {
        match self {
            Phase::Factory => format!("Unsupported syntax: You must only use `let` or `const` variable declarations with `useSlot`, instead encountered {kind}."),
            Phase::Slot => format!("Unsupported syntax: You must only use `let` or `const` variable declarations for slottable elements, instead encountered {kind}."),
        }
    }

    fn use_site_message(self, construct: &str) -> String {
        match self {
            Phase::Factory => format!("Unsupported syntax: `useSlot` or an object holding a nested `useSlot` value used inside {construct}."),
            Phase::Slot => format!("Unsupported syntax: A slottable element or an object holding a nested slottable element used inside {construct}."),
        }
    }
}

/// A read of a tracked value. Call-site records have no reference id.
#[derive(Debug, Clone, Copy)]
struct Use {
    node: NodeId,
    reference: Option<ReferenceId>,
}

/// What the node consuming a tracked value does with it.
#[derive(Debug, Clone, Copy)]
enum UseSite {
    Statement,
    Callee { call: NodeId, callee: Span },
    Declarator(NodeId),
    Other { construct: &'static str, span: Span },
}

pub struct SlotDiscovery<'s, 'a> {
    semantic: &'s Semantic<'a>,
    jsx_tags: JsxTagIndex,
    source: SourceFile<'s>,
}

impl<'s, 'a> SlotDiscovery<'s, 'a> {
    /// `program` must be the tree `semantic` was built from.
    pub fn new(semantic: &'s Semantic<'a>, program: &Program<'a>, source: SourceFile<'s>) -> Self {
        Self {
            semantic,
            jsx_tags: JsxTagIndex::build(program),
            source,
        }
    }

    pub fn discover(&self, imports: &[TrackedReference]) -> Result<SlotElements, SlotError> {
        let mut calls = Vec::new();
        for import in imports {
            self.find_call_sites(&self.uses_of(import.symbol), &import.path, &mut calls)?;
        }
        debug!(
            file = self.source.name,
            imports = imports.len(),
            call_sites = calls.len(),
            "resolved factory call sites"
        );

        let slot_path = PropertyPath::from_access_order([
            PathSegment::name(SLOT_OBJECT_NAME),
            PathSegment::Any,
        ]);
        let seeds: Vec<Use> = calls
            .into_iter()
            .map(|node| Use {
                node,
                reference: None,
            })
            .collect();

        let mut elements = SlotElements::default();
        self.find_slot_elements(&seeds, &slot_path, &mut elements)?;
        debug!(
            file = self.source.name,
            slot_elements = elements.len(),
            "resolved slot elements"
        );
        Ok(elements)
    }

    fn find_call_sites(
        &self,
        uses: &[Use],
        tracked: &PropertyPath,
        calls: &mut Vec<NodeId>,
    ) -> Result<(), SlotError> {
        for site in uses {
            let mut path = tracked.clone();
            let Some((value, user)) = self.walk(Phase::Factory, site.node, &mut path)? else {
                continue;
            };

            match self.classify(value, user) {
                UseSite::Statement => {}
                UseSite::Callee { call, callee } => {
                    if !path.is_empty() {
                        return Err(self.ambiguous_invocation(call, callee, &path));
                    }
                    trace!(call = ?call, "factory call site");
                    calls.push(call);
                }
                UseSite::Declarator(declarator) => {
                    for binding in self.bind(Phase::Factory, declarator, &path)? {
                        self.find_call_sites(&self.uses_of(binding.symbol), &binding.path, calls)?;
                    }
                }
                UseSite::Other { construct, span } => {
                    return Err(self.unsupported_use(Phase::Factory, construct, span));
                }
            }
        }
        Ok(())
    }

    fn find_slot_elements(
        &self,
        uses: &[Use],
        tracked: &PropertyPath,
        elements: &mut SlotElements,
    ) -> Result<(), SlotError> {
        for site in uses {
            let mut path = tracked.clone();

            if let Some(tag) = site.reference.and_then(|reference| self.jsx_tags.get(reference)) {
                if let Some(element) = match_jsx_tag(tag, &mut path) {
                    trace!(start = element.start, end = element.end, "slot element");
                    elements.insert(element);
                }
                continue;
            }

            let Some((value, user)) = self.walk(Phase::Slot, site.node, &mut path)? else {
                continue;
            };

            match self.classify(value, user) {
                // calling a slot directly is resolved at runtime
                UseSite::Callee { .. } if path.is_empty() => {}
                UseSite::Statement => {}
                UseSite::Declarator(declarator) => {
                    for binding in self.bind(Phase::Slot, declarator, &path)? {
                        self.find_slot_elements(&self.uses_of(binding.symbol), &binding.path, elements)?;
                    }
                }
                UseSite::Callee { call, .. } => {
                    let span = node_span(self.semantic.nodes(), call);
                    return Err(self.unsupported_use(Phase::Slot, "CallExpression", span));
                }
                UseSite::Other { construct, span } => {
                    return Err(self.unsupported_use(Phase::Slot, construct, span));
                }
            }
        }
        Ok(())
    }

    /// Value reads of `symbol`, skipping `typeof` type queries.
    fn uses_of(&self, symbol: SymbolId) -> Vec<Use> {
        let scoping = self.semantic.scoping();
        let nodes = self.semantic.nodes();
        scoping
            .get_resolved_reference_ids(symbol)
            .iter()
            .map(|&reference_id| Use {
                node: scoping.get_reference(reference_id).node_id(),
                reference: Some(reference_id),
            })
            .filter(|site| !is_type_query_operand(nodes, site.node))
            .collect()
    }

    fn walk(
        &self,
        phase: Phase,
        start: NodeId,
        path: &mut PropertyPath,
    ) -> Result<Option<(NodeId, NodeId)>, SlotError> {
        match walk_member_chain(self.semantic.nodes(), start, path) {
            Ok(ChainWalk::Value { value, user }) | Ok(ChainWalk::Ancestor { value, user }) => {
                Ok(Some((value, user)))
            }
            Ok(ChainWalk::Unrelated) => Ok(None),
            Err(DynamicMemberAccess { span }) => Err(SlotError::new(
                SlotErrorKind::UnsupportedMemberAccess,
                phase.member_access_message(),
                &self.source,
                span,
            )),
        }
    }

    fn classify(&self, value: NodeId, user: NodeId) -> UseSite {
        let nodes = self.semantic.nodes();
        let value_span = node_span(nodes, value);

        match nodes.get_node(user).kind() {
            AstKind::ExpressionStatement(_) => match concise_arrow(nodes, user) {
                Some(arrow) => UseSite::Other {
                    construct: "ArrowFunctionExpression",
                    span: arrow,
                },
                None => UseSite::Statement,
            },
            AstKind::CallExpression(call) if call.callee.span() == value_span => UseSite::Callee {
                call: user,
                callee: call.callee.span(),
            },
            AstKind::VariableDeclarator(declarator)
                if declarator
                    .init
                    .as_ref()
                    .is_some_and(|init| init.span() == value_span) =>
            {
                UseSite::Declarator(user)
            }
            kind => UseSite::Other {
                construct: construct_name(&kind),
                span: kind.span(),
            },
        }
    }

    fn bind(
        &self,
        phase: Phase,
        declarator: NodeId,
        path: &PropertyPath,
    ) -> Result<Vec<TrackedReference>, SlotError> {
        resolve_declarator(self.semantic.nodes(), declarator, path).map_err(
            |UnsupportedDeclaration { kind, span }| {
                SlotError::new(
                    SlotErrorKind::UnsupportedDeclaration { kind: kind.clone() },
                    phase.declaration_message(&kind),
                    &self.source,
                    span,
                )
            },
        )
    }

    fn ambiguous_invocation(&self, call: NodeId, callee: Span, path: &PropertyPath) -> SlotError {
        let suggestion = format!("{}.{}()", self.source.slice(callee), path.to_access_chain());
        SlotError::new(
            SlotErrorKind::AmbiguousInvocation {
                suggestion: suggestion.clone(),
            },
            format!("Unsupported syntax: Object that holds the nested `useSlot` value was used as a function. Did you mean to do `{suggestion}`?"),
            &self.source,
            node_span(self.semantic.nodes(), call),
        )
    }

    fn unsupported_use(&self, phase: Phase, construct: &str, span: Span) -> SlotError {
        SlotError::new(
            SlotErrorKind::UnsupportedUse {
                construct: construct.to_string(),
            },
            phase.use_site_message(construct),
            &self.source,
            span,
        )
    }
}

//! Safety Gate Tests
//!
//! Every construct the analysis cannot prove safe must fail the whole file
//! with a located, actionable error instead of a partial rewrite.

#[cfg(test)]
mod tests {
    use oxc_span::SourceType;

    use crate::constants::SKIPPED_MARKER;
    use crate::error::{SlotError, SlotErrorKind, TransformError, RESTRICTION_NOTE};
    use crate::options::TransformOptions;
    use crate::plugin::SlotsPlugin;
    use crate::transform::{transform_source, TransformStatus};

    fn slot_error(code: &str) -> SlotError {
        match transform_source(code, SourceType::tsx(), "component.tsx") {
            Err(TransformError::Slot(error)) => error,
            Err(other) => panic!("expected a slot error, got {other}"),
            Ok(output) => panic!("expected a slot error, got:\n{}", output.code),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // DECLARATIONS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_var_destructuring_of_call_is_rejected() {
        let error = slot_error(
            r#"
            import { useSlot } from "@beqa/react-slots";
            var { slot } = useSlot();
            "#,
        );
        assert_eq!(
            error.kind,
            SlotErrorKind::UnsupportedDeclaration {
                kind: "var".to_string()
            }
        );
        assert!(error.message.ends_with("for slottable elements, instead encountered var."));
    }

    #[test]
    fn test_var_alias_of_factory_is_rejected() {
        let error = slot_error(
            r#"
            import { useSlot } from "@beqa/react-slots";
            var alias = useSlot;
            "#,
        );
        assert_eq!(
            error.message,
            "Unsupported syntax: You must only use `let` or `const` variable declarations with `useSlot`, instead encountered var."
        );
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // MEMBER ACCESS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_dynamic_namespace_access_is_rejected() {
        let error = slot_error(
            r#"
            import * as ReactSlots from "@beqa/react-slots";
            const name = "useSlot";
            ReactSlots[name]();
            "#,
        );
        assert_eq!(error.kind, SlotErrorKind::UnsupportedMemberAccess);
        assert!(error.message.contains("`ReactSlots.useSlot`"));
    }

    #[test]
    fn test_dynamic_slot_access_is_rejected() {
        let error = slot_error(
            r#"
            import { useSlot } from "@beqa/react-slots";
            const key = "default";
            const Slot = useSlot().slot[key];
            "#,
        );
        assert_eq!(error.kind, SlotErrorKind::UnsupportedMemberAccess);
        assert!(error.message.contains("slottable node"));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // USE SITES
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_factory_passed_as_argument_is_rejected() {
        let error = slot_error(
            r#"
            import { useSlot } from "@beqa/react-slots";
            register(useSlot);
            "#,
        );
        assert!(matches!(error.kind, SlotErrorKind::UnsupportedUse { .. }));
    }

    #[test]
    fn test_slot_in_operator_is_rejected() {
        let error = slot_error(
            r#"
            import { useSlot } from "@beqa/react-slots";
            const { slot } = useSlot();
            const Fallback = slot.default || null;
            "#,
        );
        assert_eq!(
            error.kind,
            SlotErrorKind::UnsupportedUse {
                construct: "LogicalExpression".to_string()
            }
        );
        assert_eq!(
            error.message,
            "Unsupported syntax: A slottable element or an object holding a nested slottable element used inside LogicalExpression."
        );
    }

    #[test]
    fn test_factory_returned_from_arrow_is_rejected() {
        let error = slot_error(
            r#"
            import { useSlot } from "@beqa/react-slots";
            const f = () => useSlot;
            "#,
        );
        assert_eq!(
            error.kind,
            SlotErrorKind::UnsupportedUse {
                construct: "ArrowFunctionExpression".to_string()
            }
        );
        assert!(error.code_frame.contains("() => useSlot"));
    }

    #[test]
    fn test_slot_returned_from_arrow_is_rejected() {
        let error = slot_error(
            r#"
            import { useSlot } from "@beqa/react-slots";
            const { slot } = useSlot();
            const r = () => slot;
            "#,
        );
        assert_eq!(
            error.kind,
            SlotErrorKind::UnsupportedUse {
                construct: "ArrowFunctionExpression".to_string()
            }
        );
        assert!(error.message.starts_with("Unsupported syntax: A slottable element"));
    }

    #[test]
    fn test_slot_object_returned_from_arrow_is_rejected() {
        let error = slot_error(
            r#"
            import { useSlot } from "@beqa/react-slots";
            const useSlots = () => useSlot().slot;
            "#,
        );
        assert!(matches!(
            error.kind,
            SlotErrorKind::UnsupportedUse { ref construct } if construct == "ArrowFunctionExpression"
        ));
    }

    #[test]
    fn test_bare_statement_use_is_allowed() {
        let output = transform_source(
            r#"
            import { useSlot } from "@beqa/react-slots";
            const { slot } = useSlot();
            slot;
            useSlot;
            "#,
            SourceType::tsx(),
            "component.tsx",
        )
        .unwrap();
        assert_eq!(output.status, TransformStatus::Unchanged);
    }

    #[test]
    fn test_ambiguous_invocation_suggests_member_call() {
        let error = slot_error(
            r#"
            import * as ReactSlots from "@beqa/react-slots";
            const d = ReactSlots;
            d();
            "#,
        );
        assert_eq!(
            error.kind,
            SlotErrorKind::AmbiguousInvocation {
                suggestion: "d.useSlot()".to_string()
            }
        );
        assert!(error.message.contains("Did you mean to do `d.useSlot()`?"));
    }

    #[test]
    fn test_calling_slot_object_is_rejected() {
        let error = slot_error(
            r#"
            import { useSlot } from "@beqa/react-slots";
            const { slot } = useSlot();
            slot();
            "#,
        );
        assert_eq!(
            error.kind,
            SlotErrorKind::UnsupportedUse {
                construct: "CallExpression".to_string()
            }
        );
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // REPORTING
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_error_display_has_frame_and_remedy() {
        let error = slot_error(
            "import { useSlot } from \"@beqa/react-slots\";\nvar { slot } = useSlot();\n<slot.default />;\n",
        );
        let rendered = error.to_string();
        assert!(rendered.starts_with(&error.message));
        assert!(rendered.contains("> 2 | var { slot } = useSlot();"));
        assert!(rendered.contains("^^^"));
        assert!(rendered.ends_with(RESTRICTION_NOTE));
    }

    #[test]
    fn test_parse_errors_are_reported() {
        let err = transform_source("let = ;", SourceType::jsx(), "broken.jsx").unwrap_err();
        assert!(matches!(err, TransformError::Parse { ref file, .. } if file == "broken.jsx"));
    }

    #[test]
    fn test_errors_do_not_leak_between_files() {
        let first = slot_error(
            "import { useSlot } from \"@beqa/react-slots\";\nvar secretFirstFile = useSlot;\n",
        );
        let second = slot_error(
            "import { useSlot } from \"@beqa/react-slots\";\nvar other = useSlot;\n",
        );
        assert!(first.code_frame.contains("secretFirstFile"));
        assert!(!second.code_frame.contains("secretFirstFile"));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // OPT-OUT
    // ═══════════════════════════════════════════════════════════════════════════════

    const DISABLED_FILE: &str = r#"// @disable-transform-react-slots
import { useSlot } from "@beqa/react-slots";
var { slot } = useSlot();
<slot.default />;
"#;

    #[test]
    fn test_pragma_skips_unsafe_file() {
        let output = transform_source(DISABLED_FILE, SourceType::jsx(), "disabled.jsx").unwrap();
        assert_eq!(output.status, TransformStatus::Disabled);
        assert_eq!(output.code, DISABLED_FILE);
    }

    #[test]
    fn test_plugin_passes_pragma_file_through() {
        let plugin = SlotsPlugin::new(&TransformOptions::default()).unwrap();
        let output = plugin.transform(DISABLED_FILE, "/src/disabled.jsx").unwrap();
        assert_eq!(output, format!("{DISABLED_FILE}{SKIPPED_MARKER}"));
    }
}

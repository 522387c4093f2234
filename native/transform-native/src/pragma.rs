//! Opt-out pragma detection.

use lazy_static::lazy_static;
use oxc_ast::ast::Program;
use oxc_span::GetSpan;
use regex::Regex;

use crate::constants::DISABLE_PRAGMA;
use crate::error::TransformError;
use crate::source::SourceFile;

lazy_static! {
    static ref DISABLED_RE: Regex =
        Regex::new(&format!(r"\s*{}\s*", regex::escape(DISABLE_PRAGMA))).unwrap();

    /// Only comments may precede `// @disable-transform-react-slots`.
    static ref LEADING_PRAGMA_RE: Regex = Regex::new(&format!(
        r"^(?:\s*(?://[^\n\r]*|/\*[\s\S]*?\*/))*\s*//\s*@{}(?:\W|$)",
        regex::escape(DISABLE_PRAGMA)
    ))
    .unwrap();
}

/// True if a comment before the first directive or statement carries the
/// disable pragma.
pub fn is_disabled(program: &Program<'_>, source: &SourceFile<'_>) -> Result<bool, TransformError> {
    let first_code = program
        .directives
        .first()
        .map(|directive| directive.span.start)
        .into_iter()
        .chain(program.body.first().map(|statement| statement.span().start))
        .min();

    for comment in &program.comments {
        if first_code.is_some_and(|start| comment.span.start >= start) {
            break;
        }
        let text = source
            .text
            .get(comment.span.start as usize..comment.span.end as usize)
            .ok_or_else(|| TransformError::Internal {
                file: source.name.to_string(),
            })?;
        if DISABLED_RE.is_match(text) {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Text-only check run before parsing.
pub fn has_leading_pragma(code: &str) -> bool {
    LEADING_PRAGMA_RE.is_match(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn disabled(code: &str) -> bool {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, code, SourceType::jsx()).parse();
        is_disabled(&ret.program, &SourceFile::new("input.jsx", code)).unwrap()
    }

    #[test]
    fn test_pragma_before_first_statement() {
        assert!(disabled("// @disable-transform-react-slots\nimport { useSlot } from \"@beqa/react-slots\";"));
        assert!(disabled("/* license */\n/* disable-transform-react-slots */\nlet a = 1;"));
    }

    #[test]
    fn test_pragma_after_first_statement_is_ignored() {
        assert!(!disabled("let a = 1;\n// @disable-transform-react-slots\n"));
        assert!(!disabled("\"use client\";\n// disable-transform-react-slots\nlet a = 1;"));
    }

    #[test]
    fn test_pragma_in_comment_only_file() {
        assert!(disabled("// disable-transform-react-slots"));
        assert!(!disabled("// nothing to see"));
    }

    #[test]
    fn test_leading_pragma_text_check() {
        assert!(has_leading_pragma("// @disable-transform-react-slots\nlet a;"));
        assert!(has_leading_pragma("/* a\n b */\n// other\n//@disable-transform-react-slots"));
        assert!(!has_leading_pragma("let a;\n// @disable-transform-react-slots\n"));
        assert!(!has_leading_pragma("// @disable-transform-react-slotsx"));
    }
}

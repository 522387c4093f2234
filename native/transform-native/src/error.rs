//! Error types for the slot transform.

use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use oxc_span::Span;
use thiserror::Error;

use crate::source::SourceFile;

pub const RESTRICTION_NOTE: &str = "This restriction ensures slottable values remain unaltered until used as JSX elements. To prevent compilation for a specific file, add the comment `disable-transform-react-slots` at the file's top and use an alternative call signature for the slots.";

/// Which construct stopped the analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotErrorKind {
    UnsupportedMemberAccess,
    UnsupportedDeclaration { kind: String },
    UnsupportedUse { construct: String },
    AmbiguousInvocation { suggestion: String },
    NamespacedJsxName,
}

/// A construct the transform cannot prove safe. Always fatal for the file.
#[derive(Error, Debug, Diagnostic)]
#[error("{message}\n\n{code_frame}\n\n{}", RESTRICTION_NOTE)]
#[diagnostic(
    code(react_slots::unsupported_syntax),
    help("add `// @disable-transform-react-slots` before the first statement to skip this file")
)]
pub struct SlotError {
    pub kind: SlotErrorKind,
    pub message: String,
    pub code_frame: String,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("cannot be statically analyzed")]
    label: SourceSpan,
}

impl SlotError {
    pub fn new(
        kind: SlotErrorKind,
        message: impl Into<String>,
        source: &SourceFile<'_>,
        span: Span,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            code_frame: source.code_frame(span),
            source_code: NamedSource::new(source.name, source.text.to_string()),
            label: SourceSpan::from(span.start as usize..span.end as usize),
        }
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum TransformError {
    #[error("Failed to parse {file}: {message}")]
    #[diagnostic(code(react_slots::parse))]
    Parse { file: String, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Slot(#[from] SlotError),

    #[error("Could not read comments in {file} while looking for a `disable-transform-react-slots` pragma. Please open a new issue on our Github repo.")]
    #[diagnostic(code(react_slots::internal))]
    Internal { file: String },

    #[error("Failed to build the default-content-wrapper element in {file}: {message}")]
    #[diagnostic(code(react_slots::wrapper))]
    Wrapper { file: String, message: String },

    #[error("Invalid filter pattern `{pattern}`: {source}")]
    #[diagnostic(code(react_slots::invalid_pattern))]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    #[diagnostic(code(react_slots::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

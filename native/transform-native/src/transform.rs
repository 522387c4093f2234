//! Single-file transform pipeline:
//! parse → pragma → semantic → discovery → lowering → codegen.

use oxc_allocator::Allocator;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::discovery::{factory_imports, SlotDiscovery};
use crate::error::TransformError;
use crate::jsx_lowerer::SlotLowerer;
use crate::pragma;
use crate::source::SourceFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformStatus {
    Transformed,
    /// Nothing to rewrite; `code` is the input text.
    Unchanged,
    /// Opted out by pragma; `code` is the input text.
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOutput {
    pub code: String,
    pub status: TransformStatus,
    pub slot_elements: usize,
}

impl TransformOutput {
    fn untouched(source_text: &str, status: TransformStatus) -> Self {
        Self {
            code: source_text.to_string(),
            status,
            slot_elements: 0,
        }
    }
}

/// Strips a bundler query or hash suffix from a module id.
pub fn clean_id(id: &str) -> &str {
    id.split(['?', '#']).next().unwrap_or(id)
}

/// TypeScript + JSX for `.tsx` style ids, JavaScript + JSX otherwise.
pub fn source_type_for(id: &str) -> SourceType {
    let id = clean_id(id);
    if id.ends_with(".tsx") || id.ends_with(".ctsx") || id.ends_with(".mtsx") {
        SourceType::tsx()
    } else {
        SourceType::jsx()
    }
}

/// Rewrites every slot element in `source_text`.
///
/// The file either transforms completely or fails; nothing is emitted on
/// error. When there is nothing to rewrite the input is returned verbatim.
pub fn transform_source(
    source_text: &str,
    source_type: SourceType,
    file_name: &str,
) -> Result<TransformOutput, TransformError> {
    let source = SourceFile::new(file_name, source_text);
    let allocator = Allocator::default();

    let ret = Parser::new(&allocator, source_text, source_type).parse();
    if ret.panicked || !ret.errors.is_empty() {
        return Err(TransformError::Parse {
            file: file_name.to_string(),
            message: ret
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        });
    }
    let mut program = ret.program;

    if pragma::is_disabled(&program, &source)? {
        debug!(file = file_name, "disabled by pragma");
        return Ok(TransformOutput::untouched(source_text, TransformStatus::Disabled));
    }

    let elements = {
        let semantic = SemanticBuilder::new().build(&program).semantic;
        let imports = factory_imports(&program);
        if imports.is_empty() {
            debug!(file = file_name, "no factory import");
            return Ok(TransformOutput::untouched(source_text, TransformStatus::Unchanged));
        }
        SlotDiscovery::new(&semantic, &program, source).discover(&imports)?
    };

    if elements.is_empty() {
        return Ok(TransformOutput::untouched(source_text, TransformStatus::Unchanged));
    }

    let lowered = SlotLowerer::new(&allocator, elements, source).lower_program(&mut program)?;
    debug!(file = file_name, lowered, "lowered slot elements");

    Ok(TransformOutput {
        code: Codegen::new().build(&program).code,
        status: TransformStatus::Transformed,
        slot_elements: lowered,
    })
}

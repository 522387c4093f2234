//! Bundler-facing transform hook.
//!
//! Mirrors what a bundler plugin does around the core transform: filter
//! module ids, skip files that cannot contain slot elements, run the
//! transform and append a marker comment saying which of the two happened.

#[cfg(feature = "napi")]
use napi_derive::napi;
use tracing::debug;

use crate::cache::TransformCache;
use crate::constants::{IMPORTED_NODE, LIB_SOURCE, SKIPPED_MARKER, TRANSFORMED_MARKER};
use crate::error::TransformError;
use crate::options::{FileFilter, TransformOptions};
use crate::pragma;
use crate::transform::{clean_id, source_type_for, transform_source};

pub const PLUGIN_NAME: &str = "transform-react-slots";

#[derive(Debug, Clone)]
pub struct SlotsPlugin {
    filter: FileFilter,
}

impl SlotsPlugin {
    pub fn new(options: &TransformOptions) -> Result<Self, TransformError> {
        Ok(Self {
            filter: FileFilter::new(options)?,
        })
    }

    pub fn transform_include(&self, id: &str) -> bool {
        self.filter.matches(id)
    }

    /// Transforms one module. Callers are expected to have checked
    /// [`SlotsPlugin::transform_include`] first.
    pub fn transform(&self, code: &str, id: &str) -> Result<String, TransformError> {
        if let Some(reason) = skip_reason(code, id) {
            debug!(id, reason, "slot transformation skipped");
            return Ok(append_marker(code.to_string(), false));
        }

        let output = transform_source(code, source_type_for(id), clean_id(id))?;
        Ok(append_marker(output.code, true))
    }

    /// [`SlotsPlugin::transform`], memoized by id and source hash.
    pub fn transform_cached(
        &self,
        code: &str,
        id: &str,
        cache: &TransformCache,
    ) -> Result<String, TransformError> {
        if let Some(hit) = cache.get(id, code) {
            return Ok(hit);
        }
        let transformed = self.transform(code, id)?;
        cache.set(id, code, &transformed);
        Ok(transformed)
    }
}

fn skip_reason(code: &str, id: &str) -> Option<&'static str> {
    if clean_id(id).ends_with(".ts") {
        Some("plain typescript module")
    } else if pragma::has_leading_pragma(code) {
        Some("disabled by pragma")
    } else if !(code.contains(LIB_SOURCE) && code.contains(IMPORTED_NODE)) {
        Some("no reference to the runtime library")
    } else {
        None
    }
}

fn append_marker(mut code: String, transformed: bool) -> String {
    code.push_str(if transformed {
        TRANSFORMED_MARKER
    } else {
        SKIPPED_MARKER
    });
    code
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI BINDINGS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
fn plugin_from_json(options_json: Option<String>) -> napi::Result<SlotsPlugin> {
    let options = TransformOptions::from_json(options_json.as_deref().unwrap_or_default())
        .map_err(|e| napi::Error::from_reason(format!("Options parse error: {}", e)))?;
    SlotsPlugin::new(&options).map_err(|e| napi::Error::from_reason(e.to_string()))
}

#[cfg(feature = "napi")]
#[napi]
pub fn should_transform_native(id: String, options_json: Option<String>) -> napi::Result<bool> {
    Ok(plugin_from_json(options_json)?.transform_include(&id))
}

#[cfg(feature = "napi")]
#[napi]
pub fn transform_react_slots_native(
    code: String,
    id: String,
    options_json: Option<String>,
) -> napi::Result<String> {
    plugin_from_json(options_json)?
        .transform(&code, &id)
        .map_err(|e| napi::Error::from_reason(e.to_string()))
}

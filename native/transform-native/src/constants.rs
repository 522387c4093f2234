//! Names shared with the `@beqa/react-slots` runtime.
//!
//! The runtime recognizes these by exact string match, so they must never
//! drift from the library's own definitions.

/// Module the factory is imported from.
pub const LIB_SOURCE: &str = "@beqa/react-slots";

/// Exported name of the factory function.
pub const IMPORTED_NODE: &str = "useSlot";

/// Property of the factory's return value holding the slot accessors.
pub const SLOT_OBJECT_NAME: &str = "slot";

/// Tag wrapping explicit children so the runtime can tell them apart from
/// "no children".
pub const DEFAULT_CONTENT_WRAPPER: &str = "default-content-wrapper";

/// Comment text that opts a file out of the transform.
pub const DISABLE_PRAGMA: &str = "disable-transform-react-slots";

pub const TRANSFORMED_MARKER: &str = "/* slot transformation done by transform-react-slots */";
pub const SKIPPED_MARKER: &str = "/* slot transformation skipped by transform-react-slots */";

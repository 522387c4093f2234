//! # React Slots Transform
//!
//! Compile-time rewrite of slot elements for `@beqa/react-slots`.
//!
//! ```jsx
//! import { useSlot } from "@beqa/react-slots";
//! const { slot } = useSlot();
//! <slot.title className="x">Hello</slot.title>
//! ```
//!
//! becomes
//!
//! ```jsx
//! slot.title(<default-content-wrapper>Hello</default-content-wrapper>, { className: "x" })
//! ```
//!
//! ## Pipeline
//!
//! 1. **Call-site discovery**: every read of an imported `useSlot` (any
//!    alias, or `Namespace.useSlot`) is followed through member access and
//!    `let`/`const` destructuring to the calls that really invoke it.
//! 2. **Slot-element discovery**: from each call, `.slot.<name>` is followed
//!    the same way to JSX tags.
//! 3. **Lowering**: each discovered element becomes a call on its accessor.
//!
//! Anything the walk cannot prove safe (`var`, dynamic keys, passing a
//! tracked value around) fails the whole file with a code frame. A leading
//! `// @disable-transform-react-slots` comment skips the file.

mod batch;
mod bindings;
mod cache;
mod constants;
mod discovery;
mod error;
mod jsx_lowerer;
mod options;
mod path;
mod plugin;
mod pragma;
mod source;
mod transform;
mod walk;

#[cfg(test)]
mod safety_tests;

pub use batch::{collect_files, transform_directory, FileReport};
pub use cache::TransformCache;
pub use constants::*;
pub use error::{SlotError, SlotErrorKind, TransformError, RESTRICTION_NOTE};
pub use options::{FileFilter, TransformOptions};
pub use path::{PathSegment, PropertyPath};
pub use plugin::{SlotsPlugin, PLUGIN_NAME};
pub use transform::{source_type_for, transform_source, TransformOutput, TransformStatus};

#[cfg(feature = "napi")]
pub use plugin::{should_transform_native, transform_react_slots_native};

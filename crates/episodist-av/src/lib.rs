//! # episodist-av
//!
//! Container tag editing for episode files.
//!
//! This crate provides functionality for:
//! - Writing and reading MP4 tags in-process with `mp4ameta`
//! - Writing Matroska tags with `mkvpropedit` and reading them with `mkvextract`
//! - Detecting the MKVToolNix binaries and reporting their versions
//! - Staging edits on a sibling copy so a failed write never touches the original
//!
//! ## Example
//!
//! ```no_run
//! use episodist_av::{Editors, MkvToolnix};
//! use std::path::Path;
//!
//! let tools = MkvToolnix::discover(None, None);
//! let editors = Editors::system(&tools);
//! let tags = editors.read(Path::new("/tv/Show - S01E01.mkv"))?;
//! println!("episode: {:?}", tags.episode);
//! # Ok::<(), episodist_common::Error>(())
//! ```

pub mod command;
pub mod editors;
mod error;
pub mod tools;
pub mod workspace;

// Re-exports
pub use command::{CommandRunner, SystemRunner, ToolCommand, ToolOutput};
pub use editors::{Editors, MatroskaEditor, MetadataEditor, Mp4Editor, Mp4TagStore};
pub use error::{Error, Result};
pub use tools::{check_tool, check_tools, require_tool, MkvToolnix, ToolInfo};
pub use workspace::Workspace;

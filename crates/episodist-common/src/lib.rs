//! Episodist-Common: Shared vocabulary for the renaming and tagging engine.
//!
//! This crate provides the types passed between every episodist component:
//!
//! - **Core Types**: [`ContainerKind`] and the closed [`Genre`] enumeration
//! - **Media Model**: [`MediaFile`], [`MediaMetadata`], [`NamingPolicy`], [`TagSnapshot`]
//! - **Outcomes**: per-file [`BatchOutcome`] records and their step statuses
//! - **Path Utilities**: container detection and extension filtering
//! - **Error Handling**: the error taxonomy and result alias
//!
//! # Examples
//!
//! ```
//! use episodist_common::{ContainerKind, Genre, MediaFile};
//!
//! let file = MediaFile::from_path("/media/show/ep1.mkv");
//! assert_eq!(file.container, ContainerKind::Matroska);
//!
//! let genre: Genre = "science fiction".parse().unwrap();
//! assert_eq!(genre.label(), "Science Fiction");
//! assert!("Telenovela".parse::<Genre>().is_err());
//! ```

pub mod error;
pub mod media;
pub mod outcome;
pub mod paths;
pub mod types;

pub use error::{Error, ErrorKind, Result};
pub use media::*;
pub use outcome::*;
pub use types::*;

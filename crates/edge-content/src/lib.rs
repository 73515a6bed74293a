//! Build artifact enumeration for edge single-page app deployments.
//!
//! This crate provides:
//! - `MimeResolver` - Extension to content-type resolution over a fixed table
//! - `ContentStore` - Lazy, restartable enumeration of a build directory
//! - `ObjectUpload` - Per-file upload descriptors (key, content type, cache control)
//!
//! # Example
//!
//! ```ignore
//! use edge_content::ContentStore;
//!
//! let store = ContentStore::new("dist");
//! for upload in store.uploads() {
//!     let upload = upload?;
//!     println!("{} ({})", upload.key, upload.content_type);
//! }
//! ```

mod error;
mod mime;
mod store;

pub use error::*;
pub use mime::*;
pub use store::*;

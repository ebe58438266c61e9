//! Command implementations for the still CLI
//!
//! One module per functional area:
//!
//! - **audit**: Catalog descriptor validation
//! - **fetch**: Source download and verification
//! - **info**: Descriptor inspection
//! - **install**: The fetch → verify → build pipeline, and uninstall
//! - **list**: Catalog and Cellar listing

pub mod audit;
pub mod fetch;
pub mod info;
pub mod install;
pub mod list;

pub use audit::audit;
pub use fetch::fetch;
pub use info::info;
pub use install::{install, uninstall};
pub use list::list;

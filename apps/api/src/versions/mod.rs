//! Named résumé snapshots stored as `<name>.yaml` files.

pub mod handlers;
pub mod store;

pub use store::{sanitize_name, VersionStore};

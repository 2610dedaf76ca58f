//! Local vault of saved shell commands, grouped by optional categories and
//! addressable by optional aliases. Both collections are mirrored to JSON files.

pub mod error;
pub mod factory;
mod id;
pub mod notify;
pub mod search;
pub mod store;
pub mod types;
pub mod vault;

pub use error::Result;
pub use error::StoreError;
pub use factory::StorePaths;
pub use types::Category;
pub use types::Command;
pub use vault::CommandStore;

use crate::error::Result;
use crate::types::Category;
use crate::types::Command;

/// Persistence seam behind [`crate::CommandStore`].
///
/// Loads return `Ok(vec![])` when nothing has been saved yet and
/// [`crate::StoreError::Load`] when existing data cannot be read. Saves always
/// replace the whole collection.
pub trait StoreBackend: Send + Sync {
    fn load_commands(&self) -> Result<Vec<Command>>;
    fn load_categories(&self) -> Result<Vec<Category>>;
    fn save_commands(&self, commands: &[Command]) -> Result<()>;
    fn save_categories(&self, categories: &[Category]) -> Result<()>;
}

pub mod json;

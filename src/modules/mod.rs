pub mod authors;
pub mod books;
pub mod categories;
pub mod crud;

use shelf_kernel::ModuleRegistry;

use crate::service::Services;

/// Register the resource modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, services: &Services) -> anyhow::Result<()> {
    registry.register(books::create_module(services))?;
    registry.register(authors::create_module(services))?;
    registry.register(categories::create_module(services))?;
    Ok(())
}

pub mod file;
pub mod memory;
pub mod variant;

pub use file::FileRootSource;
pub use memory::InMemoryRootSource;
pub use variant::RootSourceVariant;

pub mod backend;
pub mod client;

pub use backend::CatalogBackend;
pub use client::HttpCatalogClient;

#[cfg(test)]
pub use backend::MockCatalogBackend;

pub mod archive_client;
pub mod auth;
pub mod catalog_client;
pub mod traits;

pub use archive_client::ArchiveClient;
pub use auth::{obtain_token, Credentials, Session};
pub use catalog_client::CatalogClient;
pub use traits::{ArchiveService, CatalogApi};

mod file_client_storage;

pub use file_client_storage::FileClientStorage;

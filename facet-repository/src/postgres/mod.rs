//! PostgreSQL implementation of the data repository.
mod data_repository;

pub use data_repository::PostgresDataRepository;

//! This module defines and re-exports the interfaces for the data
//! repository. It serves as a central point for accessing traits related
//! to data interaction.
mod data_repository;

pub use data_repository::DataRepository;

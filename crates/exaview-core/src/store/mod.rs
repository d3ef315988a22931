mod collection;
mod data_store;
mod mutate;
mod refresh;

pub use data_store::DataStore;

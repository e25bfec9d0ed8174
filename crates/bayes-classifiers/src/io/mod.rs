//! IO utilities for loading tabular datasets and writing scored rows.

pub mod tabular;

pub use tabular::{
    read_dataset, read_dataset_with_config, require_columns, write_scored_rows, TableReaderConfig,
};

pub mod dataset;
pub mod db;
pub mod export;
pub mod metrics;
pub mod persist;
pub mod rank_grid;
pub mod sample_data;
pub mod state;
pub mod trend;

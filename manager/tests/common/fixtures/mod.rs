//! This module provides reusable test utilities:
//! - In-memory snapshot store that records every command
//! - Test configuration builder
//! - Common test data

// Allow unused code in test fixtures - not every test binary uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_store;
pub mod test_config;
pub mod test_data;

// Re-export commonly used items
pub use mock_store::{MemoryStore, StoreCall};
pub use test_config::TestConfigBuilder;
pub use test_data::*;

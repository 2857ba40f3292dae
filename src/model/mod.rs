pub mod codec;
pub mod data_core;
pub mod history;
pub mod node;
pub mod path;
pub mod performance;
pub mod shadow_tree;

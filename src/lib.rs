pub mod attendance;
pub mod config;
pub mod formation;
pub mod roster;
pub mod sample_data;
pub mod schedule;
pub mod settings;
pub mod state;

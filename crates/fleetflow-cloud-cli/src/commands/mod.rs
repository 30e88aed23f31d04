pub mod domain;
pub mod network;
pub mod record;
pub mod task;

pub mod brokers;
pub mod clusters;
pub mod connect;
pub mod health;

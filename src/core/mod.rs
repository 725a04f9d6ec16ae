pub mod action;
pub mod containers;
pub mod coordinator;
pub mod db;
pub mod display;
pub mod filter;
pub mod model;
pub mod reference;
pub mod session;
pub mod state;
pub mod store;

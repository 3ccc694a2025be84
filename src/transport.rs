pub mod query;
pub mod rest;
pub mod ws;

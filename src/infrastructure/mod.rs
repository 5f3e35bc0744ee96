pub mod alm_clients;
pub mod config;
pub mod llm_clients;

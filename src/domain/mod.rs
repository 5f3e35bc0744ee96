pub mod alm;
pub mod batch;
pub mod document;
pub mod error;
pub mod generation_config;
pub mod model_config;
pub mod test_case;

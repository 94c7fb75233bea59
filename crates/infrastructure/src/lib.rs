//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_fortify_client;
mod json_attribute_values;
mod json_file_mapping_source;

pub use http_fortify_client::HttpFortifyClient;
pub use json_attribute_values::JsonAttributeValues;
pub use json_file_mapping_source::JsonFileMappingSource;

//! Application services and ports.

#![forbid(unsafe_code)]

mod application_resolver;
mod attribute_value_builder;
mod fortify_ports;
mod mapping_resolution_service;
mod provisioning_policy;
mod provisioning_service;

#[cfg(test)]
mod test_support;

pub use application_resolver::ApplicationResolver;
pub use attribute_value_builder::AttributeValueBuilder;
pub use fortify_ports::{
    ApplicationVersionApi, AttributeDefinitionCatalog, AttributeValueSource, MappingSource,
};
pub use mapping_resolution_service::{
    GroupResolution, MappingResolutionReport, MappingResolutionService,
};
pub use provisioning_policy::{MultipleValueValidation, ProvisioningPolicy, ResponseCodePolicy};
pub use provisioning_service::{ProvisioningResult, ProvisioningService};

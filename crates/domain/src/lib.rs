//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod application;
mod attribute;
mod mapping;
mod resolution;

pub use application::{
    ApplicationRef, ApplicationVersionQuery, ApplicationVersionRecord, CommitApplicationRequest,
    CreateApplicationProject, CreateApplicationRequest, CreationTemplate,
};
pub use attribute::{
    AttributeDefinition, AttributeOption, AttributeScalar, AttributeType, AttributeValuePayload,
    OptionValue,
};
pub use mapping::{
    MappingEntry, MappingGroup, MappingGroupKey, SourceProjectVersion, group_mapping_entries,
    parse_mapping_entries,
};
pub use resolution::{ResolutionPath, ResolutionState};

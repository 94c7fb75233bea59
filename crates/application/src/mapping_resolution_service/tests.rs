use std::collections::BTreeSet;
use std::sync::Arc;

use fortify_bridge_core::SyncError;
use fortify_bridge_domain::{
    AttributeDefinition, AttributeOption, AttributeType, ResolutionPath, ResolutionState,
    group_mapping_entries,
};

use super::MappingResolutionService;
use crate::test_support::{
    FakeFortify, FortifyCall, StaticMappingSource, StaticValues, mapping_entry,
};
use crate::{ApplicationResolver, ProvisioningPolicy, ProvisioningService};

fn build_service(fortify: Arc<FakeFortify>, values: StaticValues) -> MappingResolutionService {
    let provisioning_service = ProvisioningService::new(
        fortify.clone(),
        fortify.clone(),
        Arc::new(values),
        Arc::new(ProvisioningPolicy::default()),
    );
    MappingResolutionService::new(ApplicationResolver::new(fortify, provisioning_service))
}

fn source(rows: &[(&str, &str, &str, &str)]) -> StaticMappingSource {
    StaticMappingSource(Ok(rows
        .iter()
        .map(|(project, version, application, application_version)| {
            mapping_entry(project, version, application, application_version)
        })
        .collect()))
}

#[tokio::test]
async fn shared_target_resolves_once_with_both_sources() {
    let fortify = Arc::new(FakeFortify::new());
    let service = build_service(fortify.clone(), StaticValues::new(&[]));

    let report = service
        .resolve_mappings(&source(&[
            ("A", "1.0", "App1", "v1"),
            ("B", "2.0", "App1", "v1"),
        ]))
        .await;
    assert!(report.is_ok());
    let report = report.unwrap_or_default();

    assert_eq!(report.outcomes().len(), 1);
    let group = report.outcomes()[0].group();
    assert_eq!(group.key().to_string(), "App1_v1");
    assert_eq!(group.source_project_versions().len(), 2);
    assert!(group.target_application_id().is_some());

    let baseline = ProvisioningPolicy::default().baseline_attributes;
    assert_eq!(
        fortify
            .count(|call| matches!(call, FortifyCall::Lookup(_)))
            .await,
        2
    );
    assert_eq!(fortify.creates().await.len(), 1);
    let updates: Vec<FortifyCall> = fortify
        .calls()
        .await
        .into_iter()
        .filter(|call| matches!(call, FortifyCall::UpdateAttributes(..)))
        .collect();
    assert_eq!(updates.len(), 1);
    assert!(matches!(
        &updates[0],
        FortifyCall::UpdateAttributes(_, payload) if *payload == baseline
    ));
    assert_eq!(
        fortify
            .count(|call| matches!(call, FortifyCall::Commit(_)))
            .await,
        1
    );
}

#[tokio::test]
async fn second_pass_reuses_created_applications() {
    let fortify = Arc::new(FakeFortify::new());
    let service = build_service(fortify.clone(), StaticValues::new(&[]));
    let mapping = source(&[
        ("A", "1.0", "App1", "v1"),
        ("B", "2.0", "App2", "v1"),
        ("C", "3.0", "App1", "v1"),
    ]);

    let first = service.resolve_mappings(&mapping).await.unwrap_or_default();
    let second = service.resolve_mappings(&mapping).await.unwrap_or_default();

    let summarize = |report: &super::MappingResolutionReport| {
        report
            .resolved_groups()
            .into_iter()
            .map(|group| {
                let sources: BTreeSet<_> =
                    group.source_project_versions().iter().cloned().collect();
                (group.key().to_string(), group.target_application_id(), sources)
            })
            .collect::<BTreeSet<_>>()
    };

    assert_eq!(first.resolved_count(), 2);
    assert_eq!(summarize(&first), summarize(&second));
    assert_eq!(fortify.creates().await.len(), 2);
    assert!(second.outcomes().iter().all(|outcome| matches!(
        outcome.state(),
        ResolutionState::Resolved {
            path: ResolutionPath::Existing,
            ..
        }
    )));
}

#[tokio::test]
async fn one_failing_group_does_not_block_the_rest() {
    let business_unit =
        AttributeDefinition::new(21, "Business Unit", AttributeType::Single, "ORGANIZATION")
            .with_options(vec![AttributeOption::new("Finance", "Finance")]);
    let fortify = Arc::new(
        FakeFortify::new()
            .with_version("Existing", "v1", 77, 7)
            .with_definitions(vec![business_unit]),
    );
    let service = build_service(fortify.clone(), StaticValues::new(&[]));

    let report = service
        .resolve_mappings(&source(&[
            ("A", "1.0", "Missing", "v1"),
            ("B", "1.0", "Existing", "v1"),
        ]))
        .await
        .unwrap_or_default();

    assert_eq!(report.resolved_count(), 1);
    assert_eq!(report.failed_count(), 1);
    let failures = report.failures();
    assert_eq!(failures[0].0.target_application_name().as_str(), "Missing");
    assert!(matches!(
        failures[0].1,
        SyncError::MissingAttributeValue { .. }
    ));
    assert_eq!(report.resolved_groups()[0].target_application_id(), Some(77));
    assert!(fortify.creates().await.is_empty());
}

#[tokio::test]
async fn partial_provisioning_surfaces_orphaned_id() {
    let fortify = Arc::new(FakeFortify::new().with_commit_status(500));
    let service = build_service(fortify.clone(), StaticValues::new(&[]));

    let report = service
        .resolve_mappings(&source(&[("A", "1.0", "App1", "v1")]))
        .await
        .unwrap_or_default();

    let orphaned = report.orphaned_application_ids();
    assert_eq!(orphaned.len(), 1);
    assert!(report.resolved_groups().is_empty());
    assert!(report.outcomes()[0].group().target_application_id().is_none());
    assert_eq!(
        fortify
            .count(|call| matches!(call, FortifyCall::Delete(_)))
            .await,
        0
    );
}

#[tokio::test]
async fn mapping_load_failure_aborts_the_run() {
    let fortify = Arc::new(FakeFortify::new());
    let service = build_service(fortify.clone(), StaticValues::new(&[]));

    let result = service
        .resolve_mappings(&StaticMappingSource(Err(SyncError::Validation(
            "unreadable".to_owned(),
        ))))
        .await;

    assert!(matches!(result, Err(SyncError::MappingLoad(_))));
    assert!(fortify.calls().await.is_empty());
}

#[tokio::test]
async fn preassigned_groups_are_not_queried() {
    let fortify = Arc::new(FakeFortify::new());
    let service = build_service(fortify.clone(), StaticValues::new(&[]));
    let groups: Vec<_> = group_mapping_entries(&[mapping_entry("A", "1.0", "App1", "v1")])
        .into_iter()
        .map(|group| group.with_application_id(12))
        .collect();

    let report = service.resolve_groups(groups).await;

    assert_eq!(report.resolved_groups()[0].target_application_id(), Some(12));
    assert!(fortify.calls().await.is_empty());
}

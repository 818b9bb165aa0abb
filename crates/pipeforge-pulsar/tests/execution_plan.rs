//! End-to-end plan building against the pulsar runtime
//!
//! Mirrors the deployment flow: assemble the application from YAML
//! documents, build the execution plan, and check both the provisioned
//! topics and the per-agent descriptors handed to the orchestration layer.

use async_trait::async_trait;
use pipeforge_model::Application;
use pipeforge_pulsar::{PulsarAdmin, PulsarClusterConfig, PulsarClusterRuntime, PulsarName};
use pipeforge_runtime::{
    AgentTypeRegistry, ClusterRuntimeRegistry, ComponentType, ExecutionPlanBuilder, PlannerConfig,
    Result, RuntimeError,
};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// Admin double that records created topics.
#[derive(Default)]
struct RecordingAdmin {
    topics: Mutex<BTreeSet<String>>,
}

#[async_trait]
impl PulsarAdmin for RecordingAdmin {
    async fn topic_exists(&self, topic: &PulsarName) -> Result<bool> {
        Ok(self
            .topics
            .lock()
            .unwrap()
            .contains(&topic.fully_qualified()))
    }

    async fn create_topic(&self, topic: &PulsarName, _partitions: Option<u32>) -> Result<()> {
        self.topics.lock().unwrap().insert(topic.fully_qualified());
        Ok(())
    }
}

const INSTANCE_YAML: &str = r#"
instance:
  streamingCluster:
    type: "pulsar"
    configuration:
      webServiceUrl: "http://localhost:8080"
  computeCluster:
    type: "kubernetes"
"#;

const MODULE_YAML: &str = r#"
module: "module-1"
id: "pipeline-1"
topics:
  - name: "input-topic"
    creation-mode: create-if-not-exists
  - name: "output-topic"
    creation-mode: create-if-not-exists
pipeline:
  - name: "drop-description"
    id: "step1"
    type: "drop-fields"
    input: "input-topic"
    output: "output-topic"
    configuration:
      fields:
        - "description"
"#;

fn builder(admin: Arc<RecordingAdmin>) -> ExecutionPlanBuilder {
    let mut registry = ClusterRuntimeRegistry::new();
    registry.register(Arc::new(PulsarClusterRuntime::new(
        PulsarClusterConfig::default(),
        admin,
    )));
    ExecutionPlanBuilder::new(
        registry,
        AgentTypeRegistry::builtin("pulsar"),
        PlannerConfig::default(),
    )
}

#[tokio::test]
async fn test_full_plan_for_drop_fields_pipeline() {
    let app = Application::from_yaml(INSTANCE_YAML, &[MODULE_YAML]).unwrap();
    let admin = Arc::new(RecordingAdmin::default());
    let plan = builder(admin.clone()).build("app", &app).await.unwrap();

    // Both declared topics exist physically, exactly once.
    let topics = admin.topics.lock().unwrap().clone();
    assert_eq!(
        topics,
        BTreeSet::from([
            "persistent://public/default/input-topic".to_string(),
            "persistent://public/default/output-topic".to_string(),
        ])
    );

    // One descriptor, fully resolved.
    assert_eq!(plan.agents.len(), 1);
    let descriptor = &plan.agents[0];
    assert_eq!(descriptor.agent_id, "step1");
    assert_eq!(descriptor.component_type, ComponentType::Processor);
    assert_eq!(
        descriptor.input_topics,
        vec!["persistent://public/default/input-topic"]
    );
    assert_eq!(
        descriptor.output_topics,
        vec!["persistent://public/default/output-topic"]
    );
    assert_eq!(descriptor.streaming_cluster.cluster_type, "pulsar");

    // The instance serves lookups for the deployed agents.
    let module = app.get_module("module-1").unwrap();
    assert!(plan
        .instance
        .get_agent_implementation(&module.id, "step1")
        .is_some());
}

#[tokio::test]
async fn test_second_plan_against_same_cluster_is_noop() {
    let app = Application::from_yaml(INSTANCE_YAML, &[MODULE_YAML]).unwrap();
    let admin = Arc::new(RecordingAdmin::default());
    let builder = builder(admin.clone());

    builder.build("app", &app).await.unwrap();
    let before = admin.topics.lock().unwrap().clone();
    builder.build("app", &app).await.unwrap();
    let after = admin.topics.lock().unwrap().clone();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_missing_topic_reference_aborts_plan() {
    let module = r#"
module: "module-1"
topics:
  - name: "input-topic"
    creation-mode: create-if-not-exists
pipeline:
  - id: "step1"
    type: "drop-fields"
    input: "input-topic"
    output: "no-such-topic"
"#;
    let app = Application::from_yaml(INSTANCE_YAML, &[module]).unwrap();
    let admin = Arc::new(RecordingAdmin::default());
    let err = builder(admin.clone())
        .build("app", &app)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RuntimeError::Planning { ref source } if matches!(**source, RuntimeError::Topology { .. })
    ));
    // All-or-nothing: the failed plan deployed nothing.
    assert!(admin.topics.lock().unwrap().is_empty());
}

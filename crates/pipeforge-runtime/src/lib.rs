//! Runtime control plane for pipeforge
//!
//! Turns a declarative [`Application`](pipeforge_model::Application) into a
//! deployment-ready execution plan bound to one messaging technology.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     ExecutionPlanBuilder                     │
//! │  select runtime → create instance → deploy topics → plan     │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ClusterRuntimeRegistry        AgentTypeRegistry             │
//! │  (one runtime per cluster      (static capability data)      │
//! │   type tag, e.g. "pulsar")                                   │
//! ├──────────────────────────────────────────────────────────────┤
//! │  PhysicalApplicationInstance                                 │
//! │  logical topic → TopicHandle, module#agent → AgentHandle     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cluster runtime implementations live in their own crates
//! (e.g. `pipeforge-pulsar`) and plug in through [`ClusterRuntime`].

pub mod agents;
pub mod assets;
pub mod cluster;
pub mod error;
pub mod instance;
pub mod plan;

pub use agents::{AgentTypeProvider, AgentTypeRegistry, ComponentType};
pub use assets::{
    deploy_asset_if_missing, AssetDefinition, AssetManager, AssetManagerProvider,
    AssetManagerRegistry,
};
pub use cluster::{AgentHandle, ClusterRuntime, ClusterRuntimeRegistry, TopicHandle};
pub use error::{Result, RuntimeError};
pub use instance::PhysicalApplicationInstance;
pub use plan::{
    AgentDeploymentDescriptor, CodeStorageConfig, ExecutionPlan, ExecutionPlanBuilder,
    PlannerConfig,
};

//! Consumer control bridge for deployed pipeforge agents
//!
//! A deployed agent process runs (at least) two execution contexts: the
//! record-processing logic and the loop that owns the live
//! subscribe/poll/commit client. Agent logic must never touch the client
//! directly — it talks to a [`ConsumerControlBridge`], which tracks
//! last-known offsets per partition and forwards intents as
//! [`ConsumerCommand`]s over a FIFO channel drained by the owning loop.
//!
//! # Example
//!
//! ```rust
//! use pipeforge_agent::{ConsumerControlBridge, ConsumerCommand, TopicPartition};
//! use std::collections::HashMap;
//!
//! let (bridge, mut commands) = ConsumerControlBridge::new();
//!
//! // Agent logic requests a seek; the first sight of a partition leaves a
//! // repartition pending, emitted by the next batch call.
//! bridge.seek(TopicPartition::new("events", 0), 10).unwrap();
//! bridge.seek_batch(&HashMap::new()).unwrap();
//!
//! // The owning loop drains commands in FIFO order.
//! assert!(matches!(commands.try_recv().unwrap(), ConsumerCommand::Seek { .. }));
//! assert!(matches!(commands.try_recv().unwrap(), ConsumerCommand::Repartition(_)));
//! ```

pub mod bridge;
pub mod command;
pub mod telemetry;

pub use bridge::{BridgeError, ConsumerControlBridge, Result};
pub use command::{ConsumerCommand, TopicPartition};
pub use telemetry::init_logging;

//! Consumer control bridge
//!
//! Lives inside a deployed agent process and mediates between two execution
//! contexts: the agent's record-processing logic, which requests partition
//! operations, and the loop that owns the live subscribe/poll/commit client.
//! The only synchronization point between them is a FIFO command channel;
//! the bridge additionally tracks last-known offsets per partition and
//! coalesces repartition requests.

use crate::command::{ConsumerCommand, TopicPartition};
use dashmap::DashMap;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors raised by the consumer control bridge
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A seek carried a negative offset; the ledger is never mutated
    #[error("Invalid offset {offset} for partition {partition}")]
    InvalidOffset {
        partition: TopicPartition,
        offset: i64,
    },

    /// The owning consumer loop dropped its end of the command channel.
    /// Fatal to the agent process — commands must never be silently dropped.
    #[error("Consumer command channel closed")]
    CommandChannelClosed,
}

/// Bridges agent-logic partition operations onto the consumer-owning loop.
///
/// All methods are callable from any thread. Offset state lives in a
/// sharded concurrent map, so updates to unrelated partitions never
/// serialize against each other. The outbound channel is unbounded: a
/// producer never blocks, even when the owning loop is slow to drain.
///
/// # Example
///
/// ```rust
/// use pipeforge_agent::{ConsumerControlBridge, ConsumerCommand, TopicPartition};
///
/// let (bridge, mut commands) = ConsumerControlBridge::new();
/// bridge.seek(TopicPartition::new("events", 0), 42).unwrap();
///
/// match commands.try_recv().unwrap() {
///     ConsumerCommand::Seek { partition, offset } => {
///         assert_eq!(partition, TopicPartition::new("events", 0));
///         assert_eq!(offset, 42);
///     }
///     other => panic!("unexpected command: {other:?}"),
/// }
/// ```
pub struct ConsumerControlBridge {
    /// Last-known offset per partition, written from both contexts
    offsets: DashMap<TopicPartition, i64>,
    /// Set when a seek touches a previously-unseen partition; cleared by
    /// the next batch's test-and-clear
    pending_repartition: AtomicBool,
    /// FIFO channel to the consumer-owning loop
    commands: mpsc::UnboundedSender<ConsumerCommand>,
}

impl ConsumerControlBridge {
    /// Create a bridge and the receiving end of its command channel.
    ///
    /// The receiver belongs to the consumer-owning loop; dropping it makes
    /// every subsequent bridge operation fail with
    /// [`BridgeError::CommandChannelClosed`].
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ConsumerCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                offsets: DashMap::new(),
                pending_repartition: AtomicBool::new(false),
                commands: tx,
            },
            rx,
        )
    }

    /// Record an offset for a partition and ask the owning loop to seek the
    /// live client there.
    ///
    /// The first seek for a partition marks a repartition as pending; the
    /// request stays pending, coalesced with any others, until the next
    /// [`seek_batch`](Self::seek_batch) reads the flag.
    pub fn seek(&self, partition: TopicPartition, offset: i64) -> Result<()> {
        if offset < 0 {
            return Err(BridgeError::InvalidOffset { partition, offset });
        }
        let first_seen = self.offsets.insert(partition.clone(), offset).is_none();
        self.send(ConsumerCommand::Seek { partition, offset })?;
        if first_seen {
            self.pending_repartition.store(true, Ordering::Release);
        }
        Ok(())
    }

    /// Apply [`seek`](Self::seek) for every entry, then emit at most one
    /// `Repartition` command carrying the full current assignment if any
    /// seek — from this batch or an earlier call — left a repartition
    /// pending.
    ///
    /// Offsets are validated up front: a negative entry rejects the whole
    /// batch before any state changes.
    pub fn seek_batch(&self, offsets: &HashMap<TopicPartition, i64>) -> Result<()> {
        if let Some((partition, offset)) = offsets.iter().find(|(_, offset)| **offset < 0) {
            return Err(BridgeError::InvalidOffset {
                partition: partition.clone(),
                offset: *offset,
            });
        }
        for (partition, offset) in offsets {
            self.seek(partition.clone(), *offset)?;
        }

        // Test-and-clear: of any number of in-flight batches, exactly one
        // observes the pending flag and emits the repartition. The ledger
        // insert in seek() happens before the flag store, so the snapshot
        // taken here always contains the partition that set the flag.
        if self
            .pending_repartition
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.send(ConsumerCommand::Repartition(self.current_assignment()))?;
        }
        Ok(())
    }

    /// Ask the owning loop to stop fetching from the given partitions.
    pub fn pause(&self, partitions: Vec<TopicPartition>) -> Result<()> {
        debug!(partitions = ?partitions, "Pausing partitions");
        self.send(ConsumerCommand::Pause(partitions))
    }

    /// Ask the owning loop to resume fetching from the given partitions.
    pub fn resume(&self, partitions: Vec<TopicPartition>) -> Result<()> {
        debug!(partitions = ?partitions, "Resuming partitions");
        self.send(ConsumerCommand::Resume(partitions))
    }

    /// Signal the owning loop to run a commit-offset cycle from the current
    /// ledger snapshot. Rides the same FIFO channel as every other command,
    /// so a commit is ordered after the seeks that preceded it.
    pub fn request_commit(&self) -> Result<()> {
        info!("Commit requested");
        self.send(ConsumerCommand::Commit)
    }

    /// The set of partitions currently known to the ledger.
    pub fn current_assignment(&self) -> BTreeSet<TopicPartition> {
        self.offsets.iter().map(|e| e.key().clone()).collect()
    }

    /// Snapshot of offsets safe to commit.
    ///
    /// Partitions whose recorded offset is non-positive are excluded — a
    /// position of zero or below means the true position is still unknown
    /// and must never be committed.
    pub fn committable_offsets(&self) -> HashMap<TopicPartition, i64> {
        self.offsets
            .iter()
            .filter(|e| *e.value() > 0)
            .map(|e| (e.key().clone(), *e.value()))
            .collect()
    }

    /// Record ground truth from the owning loop after a poll/seek
    /// round-trip. Never marks a repartition pending and emits no command.
    pub fn update_offset(&self, partition: TopicPartition, offset: i64) {
        self.offsets.insert(partition, offset);
    }

    /// Accepted for interface compatibility; has no effect.
    pub fn timeout(&self, timeout: Duration) {
        warn!(?timeout, "timeout() is called but is not supported");
    }

    fn send(&self, command: ConsumerCommand) -> Result<()> {
        self.commands.send(command).map_err(|e| {
            let ledger: Vec<(TopicPartition, i64)> = self
                .offsets
                .iter()
                .map(|entry| (entry.key().clone(), *entry.value()))
                .collect();
            error!(
                command = e.0.kind(),
                ledger = ?ledger,
                "Command channel closed; last-known offsets logged for recovery"
            );
            BridgeError::CommandChannelClosed
        })
    }
}

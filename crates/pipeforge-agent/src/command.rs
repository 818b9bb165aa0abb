//! Consumer commands and the partitions they act on

use std::collections::BTreeSet;
use std::fmt;

/// A (topic, partition) pair as assigned by the messaging cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopicPartition {
    pub topic: String,
    pub partition: u32,
}

impl TopicPartition {
    pub fn new(topic: impl Into<String>, partition: u32) -> Self {
        Self {
            topic: topic.into(),
            partition,
        }
    }
}

impl fmt::Display for TopicPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.topic, self.partition)
    }
}

/// A command produced by agent logic and consumed exactly once, in FIFO
/// order, by the loop that owns the live consumer client.
///
/// The command set is closed: the owning loop matches exhaustively, so a
/// kind it does not handle is a compile error rather than a silently
/// ignored message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumerCommand {
    /// Move the live consumer's position for one partition
    Seek {
        partition: TopicPartition,
        offset: i64,
    },
    /// Stop fetching from the given partitions
    Pause(Vec<TopicPartition>),
    /// Resume fetching from the given partitions
    Resume(Vec<TopicPartition>),
    /// Re-announce the full set of assigned partitions to the client
    Repartition(BTreeSet<TopicPartition>),
    /// Run a commit-offset cycle from the current ledger snapshot
    Commit,
}

impl ConsumerCommand {
    /// Short command-kind label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Seek { .. } => "seek",
            Self::Pause(_) => "pause",
            Self::Resume(_) => "resume",
            Self::Repartition(_) => "repartition",
            Self::Commit => "commit",
        }
    }
}

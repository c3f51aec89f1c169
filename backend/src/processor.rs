use std::fmt;
use std::sync::Arc;

use shared::{EntityStore, Links, ServiceBases, StoreError, Vote};
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

use crate::metrics::Metrics;
use crate::remote::{RemoteError, ResourceService};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("associated voter does not exist")]
    MissingVoter,
    #[error("associated poll does not exist")]
    MissingPoll,
    #[error("associated vote option does not exist")]
    MissingChoice,
}

/// The voter poll-history call a workflow propagates after its local write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOp {
    Append,
    Replace,
    Remove,
}

impl fmt::Display for HistoryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryOp::Append => f.write_str("adding vote to voter history"),
            HistoryOp::Replace => f.write_str("updating vote in voter history"),
            HistoryOp::Remove => f.write_str("removing vote from voter history"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("vote {0} not found")]
    NotFound(u32),
    #[error("vote {0} already exists")]
    Duplicate(u32),
    #[error("{op} failed for vote {vote_id}: {cause}")]
    HistoryPropagationFailed {
        vote_id: u32,
        op: HistoryOp,
        cause: RemoteError,
    },
    #[error("{op} failed for vote {vote_id} and the local rollback also failed ({rollback}); vote store and voter history are out of sync")]
    CompensationFailed {
        vote_id: u32,
        op: HistoryOp,
        cause: RemoteError,
        rollback: StoreError,
    },
    #[error("{} of {} votes could not be deleted: {}", .failed.len(), .failed.len() + .deleted, format_failures(.failed))]
    PartialDelete {
        deleted: usize,
        failed: Vec<(u32, Box<VoteError>)>,
    },
    #[error("vote store error: {0}")]
    Store(StoreError),
}

fn format_failures(failed: &[(u32, Box<VoteError>)]) -> String {
    failed
        .iter()
        .map(|(id, e)| format!("vote {}: {}", id, e))
        .collect::<Vec<_>>()
        .join("; ")
}

impl VoteError {
    /// True when the vote store and the voter history may disagree.
    pub fn is_inconsistent(&self) -> bool {
        match self {
            VoteError::CompensationFailed { .. } => true,
            VoteError::PartialDelete { failed, .. } => failed.iter().any(|(_, e)| e.is_inconsistent()),
            _ => false,
        }
    }
}

/// Runs the vote workflows: validate references, write locally, propagate to
/// the voter history, and undo the local write when propagation fails.
pub struct VoteProcessor {
    store: Arc<dyn EntityStore<Vote>>,
    remote: Arc<dyn ResourceService>,
    internal: ServiceBases,
    external: ServiceBases,
    metrics: Arc<Metrics>,
}

impl VoteProcessor {
    pub fn new(
        store: Arc<dyn EntityStore<Vote>>,
        remote: Arc<dyn ResourceService>,
        internal: ServiceBases,
        external: ServiceBases,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            store,
            remote,
            internal,
            external,
            metrics,
        }
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    fn record<T>(&self, result: Result<T, VoteError>) -> Result<T, VoteError> {
        match &result {
            Ok(_) => self.metrics.record_success(),
            Err(_) => self.metrics.record_failure(),
        }
        result
    }

    /// Checks voter, poll and option in that order and stops at the first one missing.
    ///
    /// An unreachable service is reported the same way as a missing resource.
    pub async fn validate_links(&self, links: &Links) -> Result<(), ValidationError> {
        let checks = [
            (&links.voter, ValidationError::MissingVoter),
            (&links.poll, ValidationError::MissingPoll),
            (&links.choice, ValidationError::MissingChoice),
        ];

        for (addr, missing) in checks {
            match self.remote.exists(addr).await {
                Ok(()) => {}
                Err(RemoteError::Status(status)) => {
                    debug!("{} answered {}", addr, status);
                    return Err(missing);
                }
                Err(RemoteError::Transport(cause)) => {
                    warn!("Could not reach {}: {}", addr, cause);
                    return Err(missing);
                }
            }
        }
        Ok(())
    }

    pub fn list_votes(&self) -> Result<Vec<Links>, VoteError> {
        let result: Result<Vec<Links>, VoteError> = self.store.all().map_err(VoteError::Store).map(|mut votes| {
            votes.sort_by_key(|v| v.vote_id);
            votes.iter().map(|v| self.external.resolve(v)).collect()
        });
        self.record(result)
    }

    pub fn get_vote(&self, id: u32) -> Result<Links, VoteError> {
        let result = self
            .store
            .get(id)
            .map_err(|e| store_error(e, id))
            .map(|v| self.external.resolve(&v));
        self.record(result)
    }

    pub async fn add_vote(&self, vote: Vote) -> Result<Links, VoteError> {
        let result = self.add_vote_inner(vote).await;
        self.record(result)
    }

    async fn add_vote_inner(&self, vote: Vote) -> Result<Links, VoteError> {
        let links = self.internal.resolve(&vote);
        self.validate_links(&links).await?;

        self.store.add(vote).map_err(|e| store_error(e, vote.vote_id))?;

        let record = vote.history_record(OffsetDateTime::now_utc());
        if let Err(cause) = self.remote.append_history(&links.voter_poll, &record).await {
            let rollback = self.store.delete(vote.vote_id);
            return Err(self.compensated(vote.vote_id, HistoryOp::Append, cause, rollback));
        }

        info!("Added vote {}", vote.vote_id);
        Ok(self.external.resolve(&vote))
    }

    pub async fn update_vote(&self, vote: Vote) -> Result<Links, VoteError> {
        let result = self.update_vote_inner(vote).await;
        self.record(result)
    }

    async fn update_vote_inner(&self, vote: Vote) -> Result<Links, VoteError> {
        let previous = self.store.get(vote.vote_id).map_err(|e| store_error(e, vote.vote_id))?;

        // voter and poll never change on update, so check the choice against the stored poll
        let target = Vote::merge_choice(&previous, &vote);
        self.validate_links(&self.internal.resolve(&target)).await?;

        let updated = self
            .store
            .update(vote, &Vote::merge_choice)
            .map_err(|e| store_error(e, vote.vote_id))?;

        let links = self.internal.resolve(&updated);
        let record = updated.history_record(OffsetDateTime::now_utc());
        if let Err(cause) = self.remote.replace_history(&links.voter_poll, &record).await {
            let rollback = self.store.update(previous, &restore).map(|_| ());
            return Err(self.compensated(vote.vote_id, HistoryOp::Replace, cause, rollback));
        }

        info!("Updated vote {}", vote.vote_id);
        Ok(self.external.resolve(&updated))
    }

    pub async fn delete_vote(&self, id: u32) -> Result<(), VoteError> {
        let result = self.delete_vote_inner(id).await;
        self.record(result)
    }

    async fn delete_vote_inner(&self, id: u32) -> Result<(), VoteError> {
        let vote = self.store.get(id).map_err(|e| store_error(e, id))?;
        self.remove_vote(vote).await
    }

    async fn remove_vote(&self, vote: Vote) -> Result<(), VoteError> {
        self.store.delete(vote.vote_id).map_err(|e| store_error(e, vote.vote_id))?;

        let links = self.internal.resolve(&vote);
        let record = vote.history_record(OffsetDateTime::now_utc());
        if let Err(cause) = self.remote.remove_history(&links.voter_poll, &record).await {
            let rollback = self.store.add(vote);
            return Err(self.compensated(vote.vote_id, HistoryOp::Remove, cause, rollback));
        }

        info!("Deleted vote {}", vote.vote_id);
        Ok(())
    }

    /// Deletes every vote one at a time. Votes already deleted stay deleted when a later one fails.
    pub async fn delete_all_votes(&self) -> Result<usize, VoteError> {
        let result = self.delete_all_inner().await;
        self.record(result)
    }

    async fn delete_all_inner(&self) -> Result<usize, VoteError> {
        let mut votes = self.store.all().map_err(VoteError::Store)?;
        votes.sort_by_key(|v| v.vote_id);

        let mut deleted = 0;
        let mut failed = Vec::new();
        for vote in votes {
            match self.remove_vote(vote).await {
                Ok(()) => deleted += 1,
                Err(e) => failed.push((vote.vote_id, Box::new(e))),
            }
        }

        if failed.is_empty() {
            Ok(deleted)
        } else {
            Err(VoteError::PartialDelete { deleted, failed })
        }
    }

    fn compensated(
        &self,
        vote_id: u32,
        op: HistoryOp,
        cause: RemoteError,
        rollback: Result<(), StoreError>,
    ) -> VoteError {
        warn!("{} failed for vote {}: {}; rolling back", op, vote_id, cause);
        match rollback {
            Ok(()) => {
                self.metrics.record_compensation(true);
                VoteError::HistoryPropagationFailed { vote_id, op, cause }
            }
            Err(rollback) => {
                self.metrics.record_compensation(false);
                error!(
                    "Rollback of vote {} failed after {} failed: {}. Vote store and voter history are out of sync",
                    vote_id, op, rollback
                );
                VoteError::CompensationFailed {
                    vote_id,
                    op,
                    cause,
                    rollback,
                }
            }
        }
    }
}

fn restore(_current: &Vote, previous: &Vote) -> Vote {
    *previous
}

fn store_error(e: StoreError, id: u32) -> VoteError {
    match e {
        StoreError::NotFound(_) => VoteError::NotFound(id),
        StoreError::AlreadyExists(_) => VoteError::Duplicate(id),
        other => VoteError::Store(other),
    }
}

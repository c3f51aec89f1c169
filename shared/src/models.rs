use serde::{Serialize, Deserialize};
use time::OffsetDateTime;

use crate::store::Identified;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    #[serde(rename = "id")]
    pub vote_id: u32,
    pub voter_id: u32,
    pub poll_id: u32,
    pub choice_id: u32,
}

impl Vote {
    pub fn new(vote_id: u32, voter_id: u32, poll_id: u32, choice_id: u32) -> Self {
        Self { vote_id, voter_id, poll_id, choice_id }
    }

    /// Merge used on update: only the choice can change, the stored identity fields survive.
    pub fn merge_choice(old: &Vote, new: &Vote) -> Vote {
        Vote {
            choice_id: new.choice_id,
            ..*old
        }
    }

    pub fn history_record(&self, date: OffsetDateTime) -> VoteHistory {
        VoteHistory {
            history: vec![VoterPoll {
                poll_id: self.poll_id,
                date,
            }],
        }
    }
}

impl Identified for Vote {
    fn id(&self) -> u32 {
        self.vote_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Links {
    pub vote: String,
    pub voter: String,
    pub voter_poll: String,
    pub poll: String,
    pub choice: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoterPoll {
    #[serde(rename = "id")]
    pub poll_id: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

/// Body accepted by the voter service's poll-history endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteHistory {
    pub history: Vec<VoterPoll>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthReport {
    pub api_name: String,
    pub status: u16,
    pub version: String,
    pub api_uptime: String,
    pub total_api_calls: u64,
    pub total_api_calls_succeed: u64,
    pub total_api_calls_with_errors: u64,
    pub compensations_run: u64,
    pub compensations_failed: u64,
}

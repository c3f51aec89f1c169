use crate::models::{Links, Vote};

/// Base addresses of the three services a vote points into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceBases {
    pub local: String,
    pub voter: String,
    pub poll: String,
}

impl ServiceBases {
    pub fn new(local: impl Into<String>, voter: impl Into<String>, poll: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            voter: voter.into(),
            poll: poll.into(),
        }
    }

    pub fn resolve(&self, vote: &Vote) -> Links {
        resolve(vote, &self.local, &self.voter, &self.poll)
    }
}

pub fn resolve(vote: &Vote, local: &str, voter: &str, poll: &str) -> Links {
    let voter_addr = format!("{}/voters/{}", voter, vote.voter_id);
    let poll_addr = format!("{}/polls/{}", poll, vote.poll_id);

    Links {
        vote: format!("{}/votes/{}", local, vote.vote_id),
        voter_poll: format!("{}/polls/{}", voter_addr, vote.poll_id),
        choice: format!("{}/options/{}", poll_addr, vote.choice_id),
        voter: voter_addr,
        poll: poll_addr,
    }
}

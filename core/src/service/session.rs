use tracing::{info, warn};

use crate::repository::EntryRepository;
use crate::service::tracker::TrackerError;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    SignedOut,
    Ready,
    Failed(String),
}

/// Owns the persistence handle and whether we may use it right now.
/// `SignedOut -> Ready`, or `-> Failed` when the store cannot be reached.
pub struct Session<R: EntryRepository> {
    repo: R,
    state: SessionState,
}

impl<R: EntryRepository> Session<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            state: SessionState::SignedOut,
        }
    }

    pub fn sign_in(&mut self) -> Result<(), TrackerError> {
        match self.repo.authorize() {
            Ok(()) => {
                info!(store = %self.repo.describe(), "signed in");
                self.state = SessionState::Ready;
                Ok(())
            }
            Err(e) => {
                let message = format!("{:#}", e);
                warn!(store = %self.repo.describe(), "sign-in failed: {}", message);
                self.state = SessionState::Failed(message.clone());
                Err(TrackerError::Auth(message))
            }
        }
    }

    pub fn sign_out(&mut self) {
        info!("signed out");
        self.state = SessionState::SignedOut;
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    /// The repository, only while signed in.
    pub fn repository(&self) -> Result<&R, TrackerError> {
        match &self.state {
            SessionState::Ready => Ok(&self.repo),
            SessionState::SignedOut => Err(TrackerError::Auth("not signed in".to_string())),
            SessionState::Failed(reason) => Err(TrackerError::Auth(reason.clone())),
        }
    }

    pub fn describe(&self) -> String {
        self.repo.describe()
    }
}

//! Error types for repository operations.
//!
//! Two variants carry payload beyond a message: `ConflictDetected` holds
//! the colliding occurrences and the ranked alternatives, and
//! `CommitRace` holds whatever conflicts the re-check found. The HTTP
//! layer hands both payloads to the client unchanged.

use std::fmt;

use crate::engine::conflict::SessionConflict;
use crate::engine::suggest::SuggestionCandidate;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Where an error happened, for logs.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation that failed, e.g. "create_class"
    pub operation: Option<String>,
    /// Kind of entity involved, e.g. "class" or "room"
    pub entity: Option<String>,
    pub entity_id: Option<String>,
    /// Whether retrying the operation can succeed without intervention
    pub retryable: bool,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        let mut sep = "";
        for (key, value) in [
            ("operation", &self.operation),
            ("entity", &self.entity),
            ("id", &self.entity_id),
        ] {
            if let Some(value) = value {
                write!(f, "{}{}={}", sep, key, value)?;
                sep = " ";
            }
        }
        if self.retryable {
            write!(f, "{}retryable", sep)?;
        }
        write!(f, ")")
    }
}

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Requested entity does not exist.
    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// Payload validation failed before anything was stored.
    #[error("Validation error: {message} {context}")]
    ValidationError {
        message: String,
        context: ErrorContext,
    },

    /// The requested schedule collides with existing bookings.
    #[error("Schedule conflict: {message} {context}")]
    ConflictDetected {
        message: String,
        conflicts: Vec<SessionConflict>,
        suggestions: Vec<SuggestionCandidate>,
        context: ErrorContext,
    },

    /// A clean availability check went stale before its commit landed.
    ///
    /// Distinct from `ConflictDetected` so clients know to re-run the
    /// check rather than treat the slot as impossible.
    #[error("Commit race: {message} {context}")]
    CommitRace {
        message: String,
        conflicts: Vec<SessionConflict>,
        context: ErrorContext,
    },

    /// Internal/unexpected errors.
    #[error("Internal error: {message} {context}")]
    InternalError {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::not_found_with_context(message, ErrorContext::default())
    }

    pub fn not_found_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::NotFound {
            message: message.into(),
            context,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::validation_with_context(message, ErrorContext::default())
    }

    pub fn validation_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::ValidationError {
            message: message.into(),
            context,
        }
    }

    /// A conflict always travels with its payload, so the caller can
    /// show what collided and what to book instead.
    pub fn conflict(
        message: impl Into<String>,
        conflicts: Vec<SessionConflict>,
        suggestions: Vec<SuggestionCandidate>,
    ) -> Self {
        Self::ConflictDetected {
            message: message.into(),
            conflicts,
            suggestions,
            context: ErrorContext::default(),
        }
    }

    /// Races are retryable: a fresh check issues a token the commit will
    /// accept.
    pub fn commit_race(message: impl Into<String>, conflicts: Vec<SessionConflict>) -> Self {
        Self::CommitRace {
            message: message.into(),
            conflicts,
            context: ErrorContext::default().retryable(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::internal_with_context(message, ErrorContext::default())
    }

    pub fn internal_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::InternalError {
            message: message.into(),
            context,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::CommitRace { context, .. } => context.retryable,
            _ => false,
        }
    }

    /// Set the operation on the context, keeping the rest of the error.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::NotFound { context, .. }
            | Self::ValidationError { context, .. }
            | Self::ConflictDetected { context, .. }
            | Self::CommitRace { context, .. }
            | Self::InternalError { context, .. } => context,
        }
    }
}

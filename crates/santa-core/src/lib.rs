//! Core types and the request-admission pipeline for the Secret Santa service.
//!
//! This crate is deliberately free of HTTP dependencies. It owns the three
//! pieces with real invariants: participant validation, derangement
//! assignment, and the admission gate (shared-secret check plus per-client
//! rate limiting). Outbound delivery is abstracted behind [`Notifier`].

pub mod admission;
pub mod assign;
pub mod error;
pub mod notify;
pub mod participant;

pub use admission::AdmissionGate;
pub use assign::{Assigner, Assignment, AssignmentSet};
pub use error::{AdmissionError, AssignmentError, ValidationError};
pub use notify::Notifier;
pub use participant::{Participant, ParticipantList, validate};

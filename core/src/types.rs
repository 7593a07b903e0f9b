//! Shared primitive types used across the engine and the run tracker.

/// The short hex identifier assigned to a run at creation.
pub type RunId = String;

/// An identity as reported by the identity provider (chat user, CLI user).
pub type UserId = String;

/// A roster entry. Names are compared exactly, case included.
pub type PlayerName = String;

/// Parallel work units (refineries). Zero is clamped to one by every stage.
pub type UnitCount = u32;

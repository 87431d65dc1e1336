//! Unit tests for the desired-state resource model.

//! Unit tests for source resolution and credential planning.

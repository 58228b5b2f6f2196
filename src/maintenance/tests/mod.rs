//! Unit tests for the maintenance services.

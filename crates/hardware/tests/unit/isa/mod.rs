//! Unit tests for instruction kinds and instruction records.

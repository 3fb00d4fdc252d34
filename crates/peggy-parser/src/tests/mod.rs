//! Unit tests for the recognizer.

mod support;

mod parse_tests;

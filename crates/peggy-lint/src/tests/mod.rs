//! Unit and behaviour tests for the lint host.

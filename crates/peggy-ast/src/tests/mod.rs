//! Unit tests for `peggy_ast` types.


mod registry_tests;
mod visitor_tests;

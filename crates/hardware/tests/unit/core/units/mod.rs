//! Cache unit tests.

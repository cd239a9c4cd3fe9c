//! Unit test harness mirroring the source tree

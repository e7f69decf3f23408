//! Tests for the rolling-window limit.
//!
//! The window boundary is where this state machine is easiest to get wrong,
//! so both suites check `now == next_reset_time` explicitly.

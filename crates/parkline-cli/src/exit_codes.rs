//! Exit codes for the parkline CLI.
//! These codes are part of the public contract; scripts branch on them.

pub const SUCCESS: i32 = 0;
pub const UPSTREAM_FAILED: i32 = 1; // Parking API call failed (transport or parse)
pub const CONFIG_ERROR: i32 = 2; // Missing/invalid configuration or client setup

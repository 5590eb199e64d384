// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External tracker priority names mapped onto bead priorities.

/// Map a tracker priority name to a bead priority (0 = most urgent).
///
/// Case-insensitive. "Medium" and anything unrecognized (including an
/// empty name) land on 2, the store default.
pub fn priority_from_name(name: &str) -> u8 {
    match name.trim().to_ascii_lowercase().as_str() {
        "highest" | "critical" | "blocker" => 0,
        "high" => 1,
        "low" | "lowest" | "trivial" => 3,
        _ => 2,
    }
}

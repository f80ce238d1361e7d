//! Preferences Comprehensive Test Suite
//!
//! End-to-end coverage of the preference tree and its sync layer.
//!
//! ## Test Tiers
//!
//! - **Tier 1**: Tree invariants (property tests over arbitrary trees)
//! - **Tier 2**: Toggle semantics on the default tree
//! - **Tier 3**: Store load/save/repair against a record store
//! - **Tier 4**: Sessions and write ordering
//! - **Tier 5**: Config files
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test preferences_comprehensive
//! ```

mod test_utils;

// Tier 1: Tree invariants
mod tier1_tree_invariants;

// Tier 2: Toggle semantics
mod tier2_toggle_semantics;

// Tier 3: Store sync
mod tier3_store_sync;


// Tier 5: Config
mod tier5_config;

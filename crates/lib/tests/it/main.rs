/*! Integration tests for nidus.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - path_tests: Path grammar parsing and formatting
 * - merge_tests: Deep-merge semantics through the public set operation
 * - store_tests: The NestedModel operations (get/has/set/unset/remove)
 * - events_tests: Notification fan-out, ordering and silent mode
 * - serialization_tests: Snapshots and JSON round-trips
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("nidus=debug".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod helpers;
mod merge_tests;
mod serialization_tests;

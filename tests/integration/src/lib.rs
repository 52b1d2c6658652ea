//! End-to-end tests for the formpost workspace.
//!
//! Every test runs against an in-process [`mock::MockBucket`] endpoint that
//! parses the multipart bodies the dispatcher produces and answers with the
//! storage service's acknowledgement XML (or an injected failure), so the
//! full gate → dispatcher → decoder path is exercised without any external
//! service.

use std::sync::Once;


static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

mod test_upload;

//! Nextcloud multi-status fixtures and build/parse tests.

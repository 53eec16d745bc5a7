//! SQLite database handle for Quill account storage.

quill_core::define_database!(AccountDatabase, "Account database migrations complete");

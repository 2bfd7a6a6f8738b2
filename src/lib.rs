pub mod diff;
pub mod editor;
pub mod migrate;
pub mod report;
pub mod rules;
pub mod scope;
pub mod source;


pub use editor::MigrationEditor;
pub use migrate::{migrate_file, FileOutcome, FileStatus};
pub use rules::{RuleSet, SignatureRule};
pub use scope::{ReturnShape, ScopedReturnPass};
pub use source::collect_source_files;

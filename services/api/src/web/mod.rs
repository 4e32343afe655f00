pub mod documents;
pub mod fixes;
pub mod middleware;
pub mod rest;
pub mod state;

// Re-export the handlers the server binary wires into the router.
pub use documents::{create_document_handler, get_document_handler, list_documents_handler};
pub use fixes::{
    apply_fix_handler, discard_fix_handler, get_fix_handler, list_fixes_handler,
    preview_fix_handler, submit_fix_handler,
};
pub use middleware::require_admin;

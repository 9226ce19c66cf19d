mod cleanup_reconciler;

pub use cleanup_reconciler::CleanupReconciler;

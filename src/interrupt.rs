use std::sync::Arc;

/// A caller-supplied predicate consulted on every producer loop iteration
/// and in every consumer wait loop. A `true` result demands that any
/// blocked operation return promptly.
///
/// Kept as a plain `Arc<dyn Fn>` rather than a trait object hierarchy — the
/// host only ever needs to hand over one closure, there is nothing to
/// dispatch over.
pub type InterruptCb = Arc<dyn Fn() -> bool + Send + Sync>;

/// An interrupt predicate that never fires, for callers with no host
/// interrupt to wire up.
pub fn never() -> InterruptCb {
    Arc::new(|| false)
}

/// ORs a host-supplied interrupt callback with this instance's abort flag,
/// so inner blocking I/O unblocks during `close` even if the host callback
/// never fires on its own.
pub(crate) fn or_abort(host: InterruptCb, abort: Arc<std::sync::atomic::AtomicBool>) -> InterruptCb {
    Arc::new(move || abort.load(std::sync::atomic::Ordering::Acquire) || host())
}

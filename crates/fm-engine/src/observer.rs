/// Hook invoked by workers for every output cell they write.
///
/// Strategies call `on_write` after storing a value, from the worker thread
/// that stored it. Attaching an observer never changes the computed product.
pub trait WorkObserver: Send + Sync {
    fn on_write(&self, worker: usize, row: usize, column: usize);
}

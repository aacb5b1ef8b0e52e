use std::thread;

/// Spawns a thread with a name, so it can be identified in panics and debuggers.
pub fn spawn_named_thread<F, T, S>(name: S, f: F) -> thread::JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
    S: ToString,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(f)
        .expect("thread config should be valid")
}

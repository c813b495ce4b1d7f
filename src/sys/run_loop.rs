use objc2_core_foundation::CFRunLoop;

/// Runs the current thread's run loop until it is stopped or runs out of
/// sources.
pub fn run() { CFRunLoop::run() }

/// Stops the main thread's run loop. Safe to call from any thread.
pub fn stop_main() {
    if let Some(main) = CFRunLoop::main() {
        main.stop();
        main.wake_up();
    }
}

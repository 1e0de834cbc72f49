use std::cell::Cell;
use std::io;

use error_latch::ErrorLatch;

use crate::support::{CountingReader, FailAfter};

#[test]
fn attempt_returns_operation_value_on_success() {
    let latch = ErrorLatch::new();
    let value = latch.attempt(|| Ok::<_, io::Error>(7)).unwrap();

    assert_eq!(value, 7);
    assert!(latch.first_error().is_none());
    assert!(!latch.is_failed());
}

#[test]
fn first_error_wins_and_later_attempts_do_not_run() {
    let latch = ErrorLatch::new();
    let invoked = Cell::new(0u32);

    let first = latch
        .attempt(|| -> io::Result<()> { Err(io::Error::other("step one failed")) })
        .unwrap_err();

    let second = latch
        .attempt(|| -> io::Result<()> {
            invoked.set(invoked.get() + 1);
            Ok(())
        })
        .unwrap_err();
    assert_eq!(invoked.get(), 0);
    assert!(second.same_error(&first));

    let third = latch
        .attempt(|| -> io::Result<()> { Err(io::Error::other("would be second")) })
        .unwrap_err();
    assert!(third.same_error(&first));
    assert_eq!(latch.message(), "step one failed");
}

#[test]
fn force_runs_its_operation_after_a_failure() {
    let latch = ErrorLatch::new();
    let invoked = Cell::new(0u32);

    let first = latch
        .attempt(|| -> io::Result<()> { Err(io::Error::other("broken")) })
        .unwrap_err();

    let forced = latch
        .force(|| -> io::Result<()> {
            invoked.set(invoked.get() + 1);
            Ok(())
        })
        .unwrap_err();

    assert_eq!(invoked.get(), 1);
    assert!(forced.same_error(&first));
}

#[test]
fn force_failure_does_not_displace_the_first_error() {
    let latch = ErrorLatch::new();
    let first = latch
        .attempt(|| -> io::Result<()> { Err(io::Error::other("write torn")) })
        .unwrap_err();

    let forced = latch
        .force(|| -> io::Result<()> { Err(io::Error::other("cleanup failed")) })
        .unwrap_err();

    assert!(forced.same_error(&first));
    assert_eq!(latch.message(), "write torn");
}

#[test]
fn force_is_a_plain_attempt_while_clear() {
    let latch = ErrorLatch::new();
    assert_eq!(latch.force(|| Ok::<_, io::Error>(3)).unwrap(), 3);

    let first = latch
        .force(|| -> io::Result<()> { Err(io::Error::other("close failed")) })
        .unwrap_err();
    assert_eq!(first.to_string(), "close failed");
    assert!(latch.is_failed());
}

#[test]
fn run_wraps_infallible_procedures() {
    let latch = ErrorLatch::new();
    assert_eq!(latch.run(|| 21 * 2).unwrap(), 42);
}

#[test]
fn run_short_circuits_after_failure() {
    let latch = ErrorLatch::new();
    let _ = latch.attempt(|| -> io::Result<()> { Err(io::Error::other("gone")) });

    let invoked = Cell::new(false);
    assert!(latch.run(|| invoked.set(true)).is_err());
    assert!(!invoked.get());
}

#[test]
fn reset_clears_the_latch_for_new_work() {
    let latch = ErrorLatch::new();
    let _ = latch.attempt(|| -> io::Result<()> { Err(io::Error::other("first cycle")) });
    assert!(latch.is_failed());

    latch.reset();
    assert!(latch.first_error().is_none());
    assert_eq!(latch.message(), "<nil>");

    assert_eq!(latch.attempt(|| Ok::<_, io::Error>("fresh")).unwrap(), "fresh");
    assert!(!latch.is_failed());
}

#[test]
fn guarded_copy_moves_bytes_and_reports_count() {
    let latch = ErrorLatch::new();
    let mut source: &[u8] = b"0123456789";
    let mut sink = Vec::new();

    assert_eq!(latch.copy(&mut source, &mut sink).unwrap(), 10);
    assert_eq!(sink, b"0123456789");
}

#[test]
fn guarded_read_and_write_short_circuit_together() {
    let latch = ErrorLatch::new();
    let mut reader = CountingReader::new(b"abc");
    let mut writer = FailAfter::new(0);

    let first = latch.write(&mut writer, b"x").unwrap_err();
    assert_eq!(writer.calls, 1);

    let mut buf = [0u8; 3];
    let skipped = latch.read(&mut reader, &mut buf).unwrap_err();
    assert!(skipped.same_error(&first));
    assert_eq!(reader.calls, 0);
}

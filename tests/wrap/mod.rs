use std::io::{self, Read, Write};

use error_latch::{Close, ErrorLatch, LatchedError};

use crate::support::{CountingReader, Duplex, FailAfter, RecordingCloser};

/// Pulls the shared recording back out of a decorated call's `io::Error`.
fn latched(err: &io::Error) -> &LatchedError {
    err.get_ref()
        .and_then(|inner| inner.downcast_ref::<LatchedError>())
        .unwrap()
}

#[test]
fn write_decorator_scenario_first_failure_sticks() {
    let latch = ErrorLatch::new();
    let mut writer = FailAfter::new(1);
    let mut decorated = latch.writer(&mut writer);

    assert_eq!(decorated.write(b"ok").unwrap(), 2);

    let second = decorated.write(b"x").unwrap_err();
    assert_eq!(second.kind(), io::ErrorKind::BrokenPipe);

    let third = decorated.write(b"y").unwrap_err();
    assert!(latched(&third).same_error(latched(&second)));

    drop(decorated);
    // The underlying writer saw the two real calls and nothing after.
    assert_eq!(writer.calls, 2);
    assert_eq!(writer.written, b"ok");
}

#[test]
fn reads_short_circuit_once_any_sharer_failed() {
    let latch = ErrorLatch::new();
    let mut reader = CountingReader::new(b"payload");
    let mut writer = FailAfter::new(0);

    assert!(latch.writer(&mut writer).write(b"x").is_err());

    let mut decorated = latch.reader(&mut reader);
    let mut buf = [0u8; 4];
    let err = decorated.read(&mut buf).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

    drop(decorated);
    assert_eq!(reader.calls, 0);
}

#[test]
fn close_always_reaches_the_underlying_resource() {
    let latch = ErrorLatch::new();
    let _ = latch.attempt(|| -> io::Result<()> { Err(io::Error::other("mid-transfer fault")) });

    let mut closer = RecordingCloser::ok();
    let mut decorated = latch.closer(&mut closer);

    let err = decorated.close().unwrap_err();
    assert_eq!(err.get_ref().unwrap().to_string(), "mid-transfer fault");

    drop(decorated);
    assert_eq!(closer.closed, 1);
}

#[test]
fn close_failure_on_a_clear_latch_is_recorded() {
    let latch = ErrorLatch::new();
    let mut closer = RecordingCloser::failing(io::ErrorKind::ConnectionAborted);

    assert!(latch.closer(&mut closer).close().is_err());
    assert_eq!(closer.closed, 1);
    assert_eq!(latch.message(), "close failed");
}

#[test]
fn close_failure_never_displaces_the_first_error() {
    let latch = ErrorLatch::new();
    let _ = latch.attempt(|| -> io::Result<()> { Err(io::Error::other("write torn")) });

    let mut closer = RecordingCloser::failing(io::ErrorKind::ConnectionAborted);
    let err = latch.closer(&mut closer).close().unwrap_err();

    assert_eq!(closer.closed, 1);
    assert_eq!(err.get_ref().unwrap().to_string(), "write torn");
}

#[test]
fn stream_decorator_shares_one_latch_across_both_sides() {
    let latch = ErrorLatch::new();
    let mut duplex = Duplex::new(b"inbound");
    let mut decorated = latch.stream(&mut duplex);

    assert_eq!(decorated.write(b"hi").unwrap(), 2);
    decorated.get_mut().fail_writes = true;

    assert!(decorated.write(b"outbound").is_err());

    // The read side short-circuits through the shared latch.
    let mut buf = [0u8; 4];
    assert!(decorated.read(&mut buf).is_err());

    // Close still reaches the resource.
    assert!(decorated.close().is_err());

    drop(decorated);
    assert_eq!(duplex.output, b"hi");
    assert_eq!(duplex.read_calls, 0);
    assert_eq!(duplex.closed, 1);
}

#[test]
fn clean_streams_pass_data_through_untouched() {
    let latch = ErrorLatch::new();
    let mut sink = Vec::new();

    let mut reader = latch.reader(&b"round trip"[..]);
    let mut contents = String::new();
    reader.read_to_string(&mut contents).unwrap();
    assert_eq!(contents, "round trip");

    let mut writer = latch.writer(&mut sink);
    writer.write_all(b"round trip").unwrap();
    writer.flush().unwrap();
    drop(writer);

    assert_eq!(sink, b"round trip");
    assert!(latch.first_error().is_none());
}

#[test]
fn flush_short_circuits_after_failure() {
    let latch = ErrorLatch::new();
    let _ = latch.attempt(|| -> io::Result<()> { Err(io::Error::other("gone")) });

    let mut writer = latch.writer(Vec::new());
    assert!(writer.flush().is_err());
}

#[test]
fn accessors_expose_the_wrapped_primitive_and_latch() {
    let latch = ErrorLatch::new();
    let reader = latch.reader(&b"abc"[..]);

    assert_eq!(reader.get_ref(), &&b"abc"[..]);
    assert!(std::ptr::eq(reader.latch(), &latch));
    assert_eq!(reader.into_inner(), b"abc");
}

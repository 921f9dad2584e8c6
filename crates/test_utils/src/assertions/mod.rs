//! Assertion macros for stack results and driver responses.

/// Unwraps an `Ok`, panicking with the error otherwise.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("expected Ok, got error: {:?}", err),
        }
    };
}

/// Asserts that a `Result<_, TxError>` failed with the given `ErrorKind`
/// and returns the error for further inspection.
#[macro_export]
macro_rules! assert_err_kind {
    ($expr:expr, $kind:expr) => {
        match $expr {
            Ok(val) => panic!("expected {:?}, got Ok: {:?}", $kind, val),
            Err(err) => {
                assert_eq!(err.kind(), $kind, "unexpected error: {}", err);
                err
            }
        }
    };
}

/// Asserts that a driver response carries the code of the given `ErrorKind`.
#[macro_export]
macro_rules! assert_code {
    ($res:expr, $kind:expr) => {{
        let res = &$res;
        assert_eq!(res.code, $kind.abci_code(), "unexpected response: {:?}", res);
    }};
}

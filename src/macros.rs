/// Reports a user-facing error on stderr with the shell's error prefix.
macro_rules! smash_err {
    ($fmt:expr) => {
        eprintln!(concat!("smash error: ", $fmt))
    };
    ($fmt:expr, $($arg:tt)*) => {
        eprintln!(concat!("smash error: ", $fmt), $($arg)*)
    };
}

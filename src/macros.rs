#[macro_export]
/**
 A compile time assert, mirroring `static_assert` from C++

 # Examples
 ```
 use rawdir::const_assert;
 const RECORD_HEADER: usize = 19;
 const_assert!(RECORD_HEADER < 256);
 const_assert!(size_of::<u16>() == 2, "record lengths are read as u16");
 ```
*/
macro_rules! const_assert {
    ($cond:expr $(,)?) => {
        const _: () = {
            if !$cond {
                panic!(concat!("const assertion failed: ", stringify!($cond)));
            }
        };
    };
    ($cond:expr, $($arg:tt)+) => {
        const _: () = {
            if !$cond {
                panic!($($arg)+);
            }
        };
    };
}

/**
 Defines a `pub const` whose value is read from an environment variable at
 compile time, falling back to a default when the variable is unset.

 The variable must contain only ASCII digits, anything else fails the build.
 Cargo does not track the variable, so `cargo clean` after changing it.

 # Usage
 ```
 use rawdir::const_from_env;

 const_from_env!(
     /// Scratch capacity used by the examples
     EXAMPLE_CAPACITY: usize = "RAWDIR_EXAMPLE_CAPACITY_UNSET", 8192
 );

 assert_eq!(EXAMPLE_CAPACITY, 8192);
 ```
*/
#[macro_export]
macro_rules! const_from_env {
    ($(#[$meta:meta])* $name:ident: $t:ty = $env:expr, $default:expr) => {
        $(#[$meta])*
        pub const $name: $t = {
            const fn parse_env(s: &str) -> $t {
                let bytes = s.as_bytes();
                let mut n: $t = 0;
                let mut i = 0;

                while i < bytes.len() {
                    let b = bytes[i];
                    match b {
                        b'0'..=b'9' => {
                            n = n * 10 + (b - b'0') as $t;
                        }
                        _ => panic!(concat!("Invalid numeric value in environment variable: ", stringify!($env))),
                    }
                    i += 1;
                }
                n
            }

            match option_env!($env) {
                Some(val) => parse_env(val),
                None => $default as _,
            }
        };
    };
}

const _ENABLED_FEATURES: u32 = 0 + if cfg!(feature = "r1") { 1 } else { 0 };
const _: () = if _ENABLED_FEATURES > 1 {
    panic!("At most one hardware feature may be enabled.");
};

// Ensure only one feature is enabled
cfg_if::cfg_if! {
    if #[cfg(feature = "r1")] {
        pub mod r1;
        pub use r1::*;
    } else {
        // By default, let's use the rev1 board.
        pub mod r1;
        pub use r1::*;
    }
}

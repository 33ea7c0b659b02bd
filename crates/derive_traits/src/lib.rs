//! Lives in its own crate so that code generated by `derive_custom`
//! can refer to the trait by an absolute path, both from the main
//! crate and from its tests and benches.
use serde::Deserialize;
use serde::Serialize;

pub trait PtolemyParameters: Serialize + for<'de> Deserialize<'de> {
    fn section_name() -> Option<&'static str>;
}

//! Sealed trait marker for Transport implementations.
//!
//! Keeps `Transport` implementable only inside this crate, so every request
//! path goes through the same URL checks.

pub(crate) mod private {
    /// Sealed trait marker.
    pub trait Sealed {}
}

pub mod impl_fake;
#[cfg(feature = "camera-opencv")]
pub mod impl_opencv;
pub mod interface;

mod bytes;
mod complex;
mod duration;
mod net;
pub(crate) mod number;
mod time;

pub use bytes::{BytesBase64, BytesHex};
pub use complex::Complex;
pub use net::{IpMask, IpNet};
pub use time::TimeLayout;
pub(crate) use time::{format_time, parse_time};

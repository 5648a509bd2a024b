//! Scalar helpers: host name, current date and millisecond timestamps.

use chrono::{Local, Utc};

use crate::error::{KickshawsError, Result};

/// Name of the machine this program runs on.
pub fn hostname() -> Result<String> {
    ::hostname::get()?.into_string().map_err(|raw| {
        KickshawsError::InvalidArgument(format!("host name is not valid Unicode: {:?}", raw))
    })
}

/// Today's local date as `YYYY-MM-DD`.
#[must_use]
pub fn today_as_str() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Milliseconds since the Unix epoch.
#[must_use]
pub fn ts() -> i64 {
    Utc::now().timestamp_millis()
}

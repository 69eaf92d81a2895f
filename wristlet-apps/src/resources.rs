//! Resource ids bundled with the demo apps
//!
//! Ids start at 1; 0 means "no resource" in the app header.

pub const IMAGE_SUN: u32 = 1;
pub const IMAGE_CLOUD: u32 = 2;
pub const IMAGE_RAIN: u32 = 3;
pub const IMAGE_SNOW: u32 = 4;

/// Weather icons in the order the phone indexes them
pub const WEATHER_ICONS: [u32; 4] = [IMAGE_SUN, IMAGE_CLOUD, IMAGE_RAIN, IMAGE_SNOW];

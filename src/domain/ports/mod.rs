mod dimension_lookup_port;
mod image_probe_port;

pub use dimension_lookup_port::DimensionLookupPort;
pub use image_probe_port::ImageProbePort;

#[cfg(test)]
pub use image_probe_port::MockImageProbePort;

//! Sources of static device attributes.

use envprint_core::DeviceStaticAttributes;

/// Captures the device's static attributes at a point in time.
///
/// Called once per session, after both scans have finished.
pub trait AttributeSource: Send + Sync {
    fn capture(&self) -> DeviceStaticAttributes;
}

/// Always reports the same attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedAttributes(pub DeviceStaticAttributes);

impl AttributeSource for FixedAttributes {
    fn capture(&self) -> DeviceStaticAttributes {
        self.0.clone()
    }
}

impl<F> AttributeSource for F
where
    F: Fn() -> DeviceStaticAttributes + Send + Sync,
{
    fn capture(&self) -> DeviceStaticAttributes {
        self()
    }
}

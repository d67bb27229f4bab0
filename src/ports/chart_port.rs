//! Rendering widget port.

use crate::domain::chart::ChartData;
use crate::domain::error::CompareError;

/// A chart renderer that owns live chart instances.
///
/// Handles are not `Clone`; destroying one consumes it.
pub trait ChartPort {
    type Handle;

    fn create(&mut self, data: &ChartData) -> Result<Self::Handle, CompareError>;
    fn destroy(&mut self, handle: Self::Handle);
}

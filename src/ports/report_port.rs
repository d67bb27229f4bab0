//! Report output port.

use crate::domain::error::CompareError;
use crate::domain::presentation::ComparisonView;

pub trait ReportPort {
    /// Write a formatted comparison with its rendered chart to `output_path`.
    fn write(
        &self,
        view: &ComparisonView,
        chart_svg: &str,
        output_path: &str,
    ) -> Result<(), CompareError>;
}

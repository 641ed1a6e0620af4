//! All-or-nothing sample capture

use crate::domain::{CalError, CalResult, IqSample, SampleBlock};
use crate::ports::RadioFrontend;

/// Capture exactly `nsamps` samples into a fresh block.
///
/// A device-reported error code becomes `CaptureError`; fewer samples than
/// requested becomes `ShortRead`. Neither is retried.
pub fn capture_samples(radio: &mut dyn RadioFrontend, nsamps: usize) -> CalResult<SampleBlock> {
    let mut buffer = vec![IqSample::new(0.0, 0.0); nsamps];
    let report = radio.capture(&mut buffer)?;

    if let Some(code) = report.error_code {
        return Err(CalError::CaptureError(code));
    }
    if report.num_samps != nsamps {
        return Err(CalError::ShortRead {
            requested: nsamps,
            received: report.num_samps,
        });
    }
    Ok(SampleBlock::new(buffer))
}

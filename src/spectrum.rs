//! Vibration FFT spectrum reassembly and decoding.
//!
//! A full FFT spectrum does not fit in one frame, so the device streams it as
//! [`FftPage`](crate::logs::FftPage) logs. [`FftContext`] owns the reassembly
//! buffer; once the last page arrives, [`FftContext::spectrum`] decodes the
//! assembled payload into an [`FftSpectrum`].
//!
//! Spectrum magnitudes travel as quantized `u16` bins; the header carries the
//! affine scale to recover physical values, plus amplitude and energy
//! correction factors for the window function.

use crate::logs::vib_mon::{status_axis, status_window, VibMonAxis, VibMonWindow};
use crate::protocol::{JoinProgress, Pager, ReadCursor, WriteCursor};
use crate::{NavlinkError, Result};
use serde::{Deserialize, Serialize};

/// Vibration FFT reassembly buffer size, in bytes.
pub const FFT_BUFFER_SIZE: usize = 8192;

/// Maximum number of spectrum bins.
pub const MAX_BIN_COUNT: usize = 4096;

/// Reassembles multi-page FFT spectra.
pub struct FftContext {
    buffer: Box<[u8; FFT_BUFFER_SIZE]>,
    pager: Pager,
}

impl Default for FftContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FftContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self { buffer: Box::new([0u8; FFT_BUFFER_SIZE]), pager: Pager::new() }
    }

    /// Drop any partial spectrum and start over.
    pub fn reset(&mut self) {
        self.buffer.fill(0);
        self.pager.reset();
    }

    /// Feed one FFT page.
    pub fn process(
        &mut self,
        page_index: u16,
        nr_pages: u16,
        data: &[u8],
    ) -> Result<JoinProgress> {
        self.pager.join(&mut self.buffer[..], page_index, nr_pages, data)
    }

    /// A read cursor over the assembled payload, `None` while incomplete.
    ///
    /// The cursor borrows the context's buffer and is invalidated by the next
    /// [`FftContext::process`] call.
    pub fn stream(&self) -> Option<ReadCursor<'_>> {
        if self.pager.is_complete() {
            Some(ReadCursor::new(&self.buffer[..self.pager.size()]))
        } else {
            None
        }
    }

    /// Decode the assembled spectrum, `None` while incomplete.
    pub fn spectrum(&self) -> Result<Option<FftSpectrum>> {
        match self.stream() {
            Some(mut cursor) => FftSpectrum::read_from_stream(&mut cursor).map(Some),
            None => Ok(None),
        }
    }
}

/// One complete FFT spectrum.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FftSpectrum {
    /// Time in us since the sensor power up.
    pub time_stamp: u32,
    /// Axis and window status word.
    pub status: u16,
    /// Sampling frequency, in Hz.
    pub sampling_freq: u16,
    /// Scale factor from raw bin value to m/s².
    pub scale_factor: f32,
    /// Offset from raw bin value to m/s².
    pub offset: f32,
    /// Amplitude correction factor for the window function.
    pub acf: f32,
    /// Energy correction factor for the window function.
    pub ecf: f32,
    /// Quantized magnitude bins.
    pub bins: Vec<u16>,
}

impl FftSpectrum {
    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let time_stamp = cursor.read_u32();
        let status = cursor.read_u16();
        let sampling_freq = cursor.read_u16();
        let bin_count = cursor.read_u16() as usize;
        let scale_factor = cursor.read_f32();
        let offset = cursor.read_f32();
        let acf = cursor.read_f32();
        let ecf = cursor.read_f32();

        cursor.finish()?;

        if bin_count > MAX_BIN_COUNT {
            return Err(NavlinkError::payload(
                "fft_spectrum",
                format!("bin count {bin_count} exceeds {MAX_BIN_COUNT}"),
            ));
        }

        let mut bins = Vec::with_capacity(bin_count);
        for _ in 0..bin_count {
            bins.push(cursor.read_u16());
        }

        // Trailing bytes after the bins are tolerated.
        cursor.finish()?;

        Ok(Self { time_stamp, status, sampling_freq, scale_factor, offset, acf, ecf, bins })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        debug_assert!(self.bins.len() <= MAX_BIN_COUNT);

        cursor.write_u32(self.time_stamp);
        cursor.write_u16(self.status);
        cursor.write_u16(self.sampling_freq);
        cursor.write_u16(self.bins.len() as u16);
        cursor.write_f32(self.scale_factor);
        cursor.write_f32(self.offset);
        cursor.write_f32(self.acf);
        cursor.write_f32(self.ecf);

        for &bin in &self.bins {
            cursor.write_u16(bin);
        }

        cursor.finish()
    }

    pub fn axis(&self) -> VibMonAxis {
        status_axis(self.status)
    }

    pub fn window(&self) -> VibMonWindow {
        status_window(self.status)
    }

    /// Center frequency of bin `index`, in Hz.
    pub fn frequency(&self, index: usize) -> f32 {
        debug_assert!(index < self.bins.len());

        index as f32 * (f32::from(self.sampling_freq) / (self.bins.len() as f32 * 2.0))
    }

    /// Bin index covering `frequency` Hz.
    ///
    /// `frequency` must be non-negative and below the Nyquist frequency.
    pub fn bin_index(&self, frequency: f32) -> usize {
        debug_assert!(frequency >= 0.0);
        debug_assert!(frequency * 2.0 < f32::from(self.sampling_freq));

        ((frequency * self.bins.len() as f32 * 2.0) / f32::from(self.sampling_freq)) as usize
    }

    /// Magnitude of bin `index`, in m/s².
    pub fn magnitude(&self, index: usize) -> f32 {
        f32::from(self.bins[index]) * self.scale_factor + self.offset
    }

    /// Magnitude of bin `index` with the amplitude correction applied.
    pub fn magnitude_acf(&self, index: usize) -> f32 {
        self.acf * self.magnitude(index)
    }

    /// Magnitude of bin `index` with the energy correction applied.
    pub fn magnitude_ecf(&self, index: usize) -> f32 {
        self.ecf * self.magnitude(index)
    }

    /// Magnitude at `frequency` Hz, in m/s².
    pub fn magnitude_at(&self, frequency: f32) -> f32 {
        self.magnitude(self.bin_index(frequency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::vib_mon::make_status;

    fn sample_spectrum() -> FftSpectrum {
        FftSpectrum {
            time_stamp: 40_000,
            status: make_status(VibMonAxis::Y, VibMonWindow::Hanning),
            sampling_freq: 1000,
            scale_factor: 0.001,
            offset: 0.0,
            acf: 2.0,
            ecf: 1.63,
            bins: vec![0, 10, 500, 20, 5, 1, 0, 0],
        }
    }

    fn encode(spectrum: &FftSpectrum) -> Vec<u8> {
        let mut buffer = vec![0u8; 64];
        let mut writer = WriteCursor::new(&mut buffer);
        spectrum.write_to_stream(&mut writer).unwrap();
        let length = writer.position();
        buffer.truncate(length);
        buffer
    }

    #[test]
    fn round_trip() {
        let spectrum = sample_spectrum();
        let bytes = encode(&spectrum);
        assert_eq!(bytes.len(), 26 + 2 * spectrum.bins.len());

        let mut reader = ReadCursor::new(&bytes);
        let decoded = FftSpectrum::read_from_stream(&mut reader).unwrap();
        assert_eq!(decoded, spectrum);
        assert_eq!(decoded.axis(), VibMonAxis::Y);
        assert_eq!(decoded.window(), VibMonWindow::Hanning);
    }

    #[test]
    fn trailing_bytes_after_the_bins_are_tolerated() {
        let mut spectrum = sample_spectrum();
        spectrum.bins = vec![100, 200, 300, 400];

        let mut bytes = encode(&spectrum);
        bytes.extend_from_slice(&[0xDE, 0xAD]);

        let mut reader = ReadCursor::new(&bytes);
        let decoded = FftSpectrum::read_from_stream(&mut reader).unwrap();
        assert_eq!(decoded.bins, vec![100, 200, 300, 400]);
    }

    #[test]
    fn frequency_mapping() {
        let spectrum = sample_spectrum();

        // 8 bins over a 1 kHz sampling rate: 62.5 Hz per bin.
        assert_eq!(spectrum.frequency(0), 0.0);
        assert_eq!(spectrum.frequency(2), 125.0);
        assert_eq!(spectrum.bin_index(125.0), 2);
        assert_eq!(spectrum.bin_index(130.0), 2);

        assert_eq!(spectrum.magnitude(2), 0.5);
        assert_eq!(spectrum.magnitude_acf(2), 1.0);
        assert_eq!(spectrum.magnitude_at(125.0), 0.5);
    }

    #[test]
    fn oversized_bin_count_is_rejected() {
        let mut bytes = encode(&sample_spectrum());
        // Patch the bin count field (offset 8) beyond the maximum.
        bytes[8..10].copy_from_slice(&(MAX_BIN_COUNT as u16 + 1).to_le_bytes());

        let mut reader = ReadCursor::new(&bytes);
        assert!(matches!(
            FftSpectrum::read_from_stream(&mut reader),
            Err(NavlinkError::Payload { .. })
        ));
    }

    #[test]
    fn truncated_bins_are_rejected() {
        let bytes = encode(&sample_spectrum());
        let mut reader = ReadCursor::new(&bytes[..bytes.len() - 3]);
        assert!(FftSpectrum::read_from_stream(&mut reader).is_err());
    }

    #[test]
    fn context_reassembles_a_paged_spectrum() {
        let spectrum = sample_spectrum();
        let bytes = encode(&spectrum);

        let mut ctx = FftContext::new();
        let pages: Vec<&[u8]> = bytes.chunks(16).collect();

        for (index, page) in pages.iter().enumerate() {
            let progress = ctx.process(index as u16, pages.len() as u16, page).unwrap();

            if index + 1 == pages.len() {
                assert_eq!(progress, JoinProgress::Complete);
            } else {
                assert_eq!(progress, JoinProgress::Pending);
                assert!(ctx.spectrum().unwrap().is_none());
            }
        }

        assert_eq!(ctx.spectrum().unwrap().unwrap(), spectrum);
    }
}

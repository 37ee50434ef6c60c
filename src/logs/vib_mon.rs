//! Vibration monitoring logs.
//!
//! Two messages share this family: the [`VibMonReport`] summary (band RMS and
//! peak figures at a low rate) and the [`FftPage`] raw spectrum pages, which
//! are reassembled by an [`FftContext`](crate::spectrum::FftContext) into a
//! full [`FftSpectrum`](crate::spectrum::FftSpectrum).
//!
//! Both carry the measured axis and the FFT window function packed into the
//! status word.

use crate::protocol::{ReadCursor, WriteCursor};
use crate::{NavlinkError, Result};
use serde::{Deserialize, Serialize};

const AXIS_SHIFT: u16 = 0;
const AXIS_MASK: u16 = 0x0003;
const WINDOW_SHIFT: u16 = 3;
const WINDOW_MASK: u16 = 0x0003;

/// Maximum data bytes carried by one FFT page.
pub const MAX_PAGE_DATA: usize = 64;

/// Number of frequency bands in a vibration report.
pub const NR_BANDS: usize = 4;

/// Measured sensor axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum VibMonAxis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl VibMonAxis {
    fn from_bits(bits: u16) -> Self {
        match bits {
            1 => VibMonAxis::Y,
            2 => VibMonAxis::Z,
            _ => VibMonAxis::X,
        }
    }
}

/// FFT window function applied by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum VibMonWindow {
    /// Rectangular (uniform) window.
    Rectangular = 0,
    /// Hanning (Hann) window.
    Hanning = 1,
    /// Flat-top window.
    FlatTop = 2,
}

impl VibMonWindow {
    fn from_bits(bits: u16) -> Self {
        match bits {
            1 => VibMonWindow::Hanning,
            2 => VibMonWindow::FlatTop,
            _ => VibMonWindow::Rectangular,
        }
    }
}

/// Extract the axis from a vibration monitoring status word.
pub fn status_axis(status: u16) -> VibMonAxis {
    VibMonAxis::from_bits((status >> AXIS_SHIFT) & AXIS_MASK)
}

/// Extract the window from a vibration monitoring status word.
pub fn status_window(status: u16) -> VibMonWindow {
    VibMonWindow::from_bits((status >> WINDOW_SHIFT) & WINDOW_MASK)
}

/// Build a vibration monitoring status word.
pub fn make_status(axis: VibMonAxis, window: VibMonWindow) -> u16 {
    (((axis as u16) & AXIS_MASK) << AXIS_SHIFT)
        | (((window as u16) & WINDOW_MASK) << WINDOW_SHIFT)
}

/// One page of a raw FFT spectrum.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FftPage {
    /// 0-based page index.
    pub page_index: u16,
    /// Total number of pages in the spectrum.
    pub nr_pages: u16,
    /// Page data bytes.
    pub data: Vec<u8>,
}

impl FftPage {
    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let page_index = cursor.read_u16();
        let nr_pages = cursor.read_u16();
        let size = cursor.read_u16() as usize;

        cursor.finish()?;

        if page_index >= nr_pages {
            return Err(NavlinkError::payload(
                "vib_mon_fft",
                format!("invalid page index {page_index}/{nr_pages}"),
            ));
        }

        if size > MAX_PAGE_DATA {
            return Err(NavlinkError::payload(
                "vib_mon_fft",
                format!("invalid page size {size}"),
            ));
        }

        let data = cursor.read_bytes(size).to_vec();
        cursor.finish()?;

        Ok(Self { page_index, nr_pages, data })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        debug_assert!(self.data.len() <= MAX_PAGE_DATA);

        cursor.write_u16(self.page_index);
        cursor.write_u16(self.nr_pages);
        cursor.write_u16(self.data.len() as u16);
        cursor.write_bytes(&self.data);

        cursor.finish()
    }
}

/// Vibration figures over one frequency band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VibMonBand {
    /// First frequency of the band, in Hz.
    pub freq1: f32,
    /// Last frequency of the band, in Hz.
    pub freq2: f32,
    /// RMS over the band, in m/s².
    pub rms: f32,
    /// Frequency of the peak harmonic in the band, in Hz.
    pub peak_harmonic: f32,
    /// Magnitude of the peak harmonic, in m/s².
    pub peak_magnitude: f32,
}

impl Default for VibMonBand {
    fn default() -> Self {
        Self {
            freq1: f32::NAN,
            freq2: f32::NAN,
            rms: f32::NAN,
            peak_harmonic: f32::NAN,
            peak_magnitude: f32::NAN,
        }
    }
}

/// Periodic vibration monitoring summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VibMonReport {
    /// Time in us since the sensor power up.
    pub time_stamp: u32,
    /// Axis and window status word.
    pub status: u16,
    /// Mean of the raw signal, in m/s².
    pub mean: f32,
    /// RMS from 0 Hz to the Nyquist frequency, in m/s².
    pub rms: f32,
    /// Per-band figures.
    pub bands: [VibMonBand; NR_BANDS],
}

impl Default for VibMonReport {
    fn default() -> Self {
        Self {
            time_stamp: 0,
            status: make_status(VibMonAxis::X, VibMonWindow::Rectangular),
            mean: f32::NAN,
            rms: f32::NAN,
            bands: [VibMonBand::default(); NR_BANDS],
        }
    }
}

impl VibMonReport {
    pub fn read_from_stream(cursor: &mut ReadCursor<'_>) -> Result<Self> {
        let time_stamp = cursor.read_u32();
        let status = cursor.read_u16();
        let mean = cursor.read_f32();
        let rms = cursor.read_f32();

        let mut bands = [VibMonBand::default(); NR_BANDS];
        for band in &mut bands {
            band.freq1 = cursor.read_f32();
            band.freq2 = cursor.read_f32();
            band.rms = cursor.read_f32();
            band.peak_harmonic = cursor.read_f32();
            band.peak_magnitude = cursor.read_f32();
        }

        cursor.finish()?;

        Ok(Self { time_stamp, status, mean, rms, bands })
    }

    pub fn write_to_stream(&self, cursor: &mut WriteCursor<'_>) -> Result<()> {
        cursor.write_u32(self.time_stamp);
        cursor.write_u16(self.status);
        cursor.write_f32(self.mean);
        cursor.write_f32(self.rms);

        for band in &self.bands {
            cursor.write_f32(band.freq1);
            cursor.write_f32(band.freq2);
            cursor.write_f32(band.rms);
            cursor.write_f32(band.peak_harmonic);
            cursor.write_f32(band.peak_magnitude);
        }

        cursor.finish()
    }

    pub fn axis(&self) -> VibMonAxis {
        status_axis(self.status)
    }

    pub fn window(&self) -> VibMonWindow {
        status_window(self.status)
    }

    /// The band whose peak harmonic has the highest magnitude.
    pub fn max_peak_band(&self) -> &VibMonBand {
        let mut max_magnitude = 0.0f32;
        let mut max_index = 0;

        for (index, band) in self.bands.iter().enumerate() {
            if band.peak_magnitude > max_magnitude {
                max_magnitude = band.peak_magnitude;
                max_index = index;
            }
        }

        &self.bands[max_index]
    }
}

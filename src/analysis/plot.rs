use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::coord::Shift;
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use crate::analysis::error::AnalysisError;
use crate::analysis::{ChannelAnalysis, ChannelReport};
type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub palette: Vec<RGBColor>,
    /// Captions and axis labels need a system font; turn off for headless rendering.
    pub draw_labels: bool,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            background: RGBColor(10, 10, 10),
            palette: vec![BLUE, RED, GREEN, CYAN, MAGENTA, YELLOW, WHITE],
            draw_labels: true,
        }
    }
}
/// Renders one row per channel: the detrended series on the left and its
/// magnitude spectrum (log scale) on the right.
pub fn render_analysis_png(
    reports: &[ChannelReport],
    style: &PlotStyle,
) -> Result<Vec<u8>, AnalysisError> {
    if reports.is_empty() {
        return Err(AnalysisError::Plot("no channels to render".into()));
    }
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let panels = root.split_evenly((reports.len(), 2));
        for (row, report) in reports.iter().enumerate() {
            let color = style
                .palette
                .get(row % style.palette.len().max(1))
                .copied()
                .unwrap_or(WHITE);
            let (wave, spectrum) = (&panels[row * 2], &panels[row * 2 + 1]);
            match &report.outcome {
                Ok(analysis) => {
                    draw_waveform(wave, &report.label, analysis, color, style)?;
                    draw_spectrum(spectrum, &report.label, analysis, color, style)?;
                }
                Err(err) if style.draw_labels => {
                    wave.titled(
                        &format!("{}: {err}", report.label),
                        ("sans-serif", 16).into_font().color(&WHITE),
                    )?;
                }
                Err(_) => {}
            }
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
fn draw_waveform(
    area: &Panel<'_>,
    label: &str,
    analysis: &ChannelAnalysis,
    color: RGBColor,
    style: &PlotStyle,
) -> Result<(), AnalysisError> {
    let series = &analysis.series;
    let t_end = series.times_s.last().copied().unwrap_or(0.0);
    let t_start = series.times_s.first().copied().unwrap_or(0.0);
    let t_end = if t_end > t_start { t_end } else { t_start + 1.0 };
    let y_min = series.values.iter().copied().fold(0.0f64, f64::min);
    let y_max = series.values.iter().copied().fold(0.0f64, f64::max);
    let y_bounds = if (y_max - y_min).abs() < f64::EPSILON {
        (-1.0, 1.0)
    } else {
        (y_min, y_max)
    };
    let mut builder = ChartBuilder::on(area);
    builder.margin(8);
    if style.draw_labels {
        builder
            .caption(
                format!("{label} time (shape={})", analysis.shape),
                ("sans-serif", 16).into_font().color(&WHITE),
            )
            .set_label_area_size(LabelAreaPosition::Left, 45)
            .set_label_area_size(LabelAreaPosition::Bottom, 30);
    }
    let mut chart = builder.build_cartesian_2d(t_start..t_end, y_bounds.0..y_bounds.1)?;
    let mut mesh = chart.configure_mesh();
    mesh.light_line_style(&WHITE.mix(0.1));
    if style.draw_labels {
        mesh.x_desc("time (s)");
    } else {
        mesh.x_labels(0).y_labels(0);
    }
    mesh.draw()?;
    let points = series
        .times_s
        .iter()
        .copied()
        .zip(series.values.iter().copied());
    chart.draw_series(LineSeries::new(points, &color))?;
    Ok(())
}
fn draw_spectrum(
    area: &Panel<'_>,
    label: &str,
    analysis: &ChannelAnalysis,
    color: RGBColor,
    style: &PlotStyle,
) -> Result<(), AnalysisError> {
    const FLOOR: f64 = 1e-12;
    let spectrum = &analysis.spectrum;
    let f_max = spectrum
        .frequencies_hz
        .last()
        .copied()
        .unwrap_or(0.0)
        .max(1e-9);
    let m_max = spectrum
        .magnitudes
        .iter()
        .copied()
        .fold(0.0f64, f64::max)
        .max(1.0)
        + FLOOR;
    let mut builder = ChartBuilder::on(area);
    builder.margin(8);
    if style.draw_labels {
        builder
            .caption(
                format!("{label} spectrum (peak {:.3} Hz)", analysis.dominant_hz),
                ("sans-serif", 16).into_font().color(&WHITE),
            )
            .set_label_area_size(LabelAreaPosition::Left, 55)
            .set_label_area_size(LabelAreaPosition::Bottom, 30);
    }
    let mut chart = builder.build_cartesian_2d(0f64..f_max, (FLOOR..m_max * 2.0).log_scale())?;
    let mut mesh = chart.configure_mesh();
    mesh.light_line_style(&WHITE.mix(0.1));
    if style.draw_labels {
        mesh.x_desc("freq (Hz)");
    } else {
        mesh.x_labels(0).y_labels(0);
    }
    mesh.draw()?;
    let points = spectrum
        .frequencies_hz
        .iter()
        .copied()
        .zip(spectrum.magnitudes.iter().map(|m| m + FLOOR));
    chart.draw_series(LineSeries::new(points, &color))?;
    Ok(())
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, AnalysisError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| AnalysisError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}

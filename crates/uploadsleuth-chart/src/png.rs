/// Static PNG chart: bars rasterised straight into an RGB buffer.
///
/// The image shows axes, quarter gridlines and one bar per interval, scaled
/// so the busiest interval reaches the top of the plot area. The x axis is
/// labelled with the first and last interval start (UTC), the y axis with
/// zero and the peak count.
use crate::error::{ChartError, Result};
use crate::glyphs::{draw_text, text_width, TEXT_HEIGHT};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, Rgb, RgbImage};
use std::io::Write;
use uploadsleuth_core::model::FrequencySeries;

/// Blank border around the plot area, in pixels.
const MARGIN: u32 = 40;
/// Smallest accepted edge length; leaves a plot area of at least 40 px.
pub const MIN_EDGE: u32 = 2 * MARGIN + 40;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([60, 60, 60]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const BAR: Rgb<u8> = Rgb([31, 119, 180]);

/// Gap between the axis and its labels, in pixels.
const LABEL_GAP: u32 = 6;
const LABEL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Draw `series` into a new `width` × `height` image.
pub fn render_image(series: &FrequencySeries, width: u32, height: u32) -> Result<RgbImage> {
    if width < MIN_EDGE || height < MIN_EDGE {
        return Err(ChartError::ImageSize { width, height });
    }

    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    let left = MARGIN;
    let right = width - MARGIN;
    let top = MARGIN;
    let bottom = height - MARGIN;
    let plot_h = (bottom - top) as f32;

    for quarter in 1..=4 {
        let y = bottom - ((plot_h * quarter as f32 / 4.0) as u32);
        fill_rect(&mut img, left, y, right, y + 1, GRID);
    }

    let peak = series.peak().map_or(0, |b| b.count);
    if peak > 0 {
        let slot = (right - left) as f32 / series.len() as f32;
        // Leave a one-pixel gap between bars once they are wide enough.
        let gap = if slot >= 3.0 { 1.0 } else { 0.0 };
        for (i, bucket) in series.buckets().iter().enumerate() {
            if bucket.count == 0 {
                continue;
            }
            let x0 = left + (slot * i as f32) as u32;
            let x1 = (left + (slot * (i + 1) as f32 - gap) as u32).max(x0 + 1).min(right);
            let bar_h = ((bucket.count as f32 / peak as f32) * plot_h).round().max(1.0) as u32;
            fill_rect(&mut img, x0, bottom - bar_h, x1, bottom, BAR);
        }
    }

    // Axes last so bars never paint over them.
    fill_rect(&mut img, left, bottom, right, bottom + 1, AXIS);
    fill_rect(&mut img, left.saturating_sub(1), top, left, bottom + 1, AXIS);
    draw_labels(&mut img, series, peak, (left, top, right, bottom));
    Ok(img)
}

/// Interval-start labels under the x axis and count labels left of the y axis.
fn draw_labels(
    img: &mut RgbImage,
    series: &FrequencySeries,
    peak: u64,
    (left, top, right, bottom): (u32, u32, u32, u32),
) {
    let (Some(first), Some(last)) = (series.buckets().first(), series.buckets().last()) else {
        return;
    };

    let label_y = bottom + LABEL_GAP;
    let first_label = first.start.format(LABEL_TIME_FORMAT).to_string();
    let first_w = text_width(&first_label);
    draw_text(img, left, label_y, &first_label, AXIS);

    if series.len() > 1 {
        let last_label = last.start.format(LABEL_TIME_FORMAT).to_string();
        let last_x = right.saturating_sub(text_width(&last_label));
        // Skip the last label rather than overlap the first on narrow images.
        if last_x >= left + first_w + LABEL_GAP {
            draw_text(img, last_x, label_y, &last_label, AXIS);
        }
    }

    let half_text = TEXT_HEIGHT / 2;
    let count_right = left.saturating_sub(LABEL_GAP);
    let peak_label = peak.to_string();
    draw_text(
        img,
        count_right.saturating_sub(text_width(&peak_label)),
        top.saturating_sub(half_text),
        &peak_label,
        AXIS,
    );
    draw_text(
        img,
        count_right.saturating_sub(text_width("0")),
        bottom.saturating_sub(half_text),
        "0",
        AXIS,
    );
}

/// Encode `series` as PNG bytes into `out`.
pub fn write_png<W: Write>(out: &mut W, series: &FrequencySeries, width: u32, height: u32) -> Result<()> {
    let img = render_image(series, width, height)?;
    PngEncoder::new(out).write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgb8)?;
    Ok(())
}

/// Fill the half-open rectangle `[x0, x1) × [y0, y1)`, clipped to the image.
fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let x1 = x1.min(img.width());
    let y1 = y1.min(img.height());
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, color);
        }
    }
}

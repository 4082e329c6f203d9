//! ACF and PACF plots

use crate::error::Result;
use plotters::prelude::*;
use series_math::Correlogram;

/// Title of the autocorrelation plot
pub const ACF_TITLE: &str = "Autocorrelation Function (ACF)";
/// Title of the partial autocorrelation plot
pub const PACF_TITLE: &str = "Partial Autocorrelation Function (PACF)";

const SIZE: (u32, u32) = (640, 320);

const STEM_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Stem plot of a correlogram with its shaded confidence band
pub fn correlogram_svg(title: &str, correlogram: &Correlogram) -> Result<String> {
    let max_lag = correlogram.max_lag() as i32;
    let reach = correlogram
        .values
        .iter()
        .chain(&correlogram.bands)
        .fold(1.0f64, |m, v| m.max(v.abs()))
        * 1.1;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 18))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(-1..max_lag + 1, -reach..reach)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels((max_lag as usize + 3).min(12))
            .y_labels(5)
            .y_label_formatter(&|v: &f64| format!("{:.1}", v))
            .x_desc("Lag")
            .draw()?;

        // Confidence band around zero, from lag 1 on
        if correlogram.bands.len() > 1 {
            let upper = correlogram
                .bands
                .iter()
                .enumerate()
                .skip(1)
                .map(|(lag, band)| (lag as i32, *band));
            let lower = correlogram
                .bands
                .iter()
                .enumerate()
                .skip(1)
                .rev()
                .map(|(lag, band)| (lag as i32, -band));
            let outline: Vec<(i32, f64)> = upper.chain(lower).collect();
            chart.draw_series(std::iter::once(Polygon::new(
                outline,
                STEM_COLOR.mix(0.2).filled(),
            )))?;
        }

        chart.draw_series(LineSeries::new(
            vec![(-1, 0.0), (max_lag + 1, 0.0)],
            BLACK.stroke_width(1),
        ))?;

        chart.draw_series(correlogram.values.iter().enumerate().map(|(lag, value)| {
            PathElement::new(
                vec![(lag as i32, 0.0), (lag as i32, *value)],
                STEM_COLOR.stroke_width(2),
            )
        }))?;
        chart.draw_series(
            correlogram
                .values
                .iter()
                .enumerate()
                .map(|(lag, value)| Circle::new((lag as i32, *value), 4, STEM_COLOR.filled())),
        )?;

        root.present()?;
    }
    Ok(svg)
}

/// Text bar plot of a correlogram for terminal output.
///
/// Lags outside the confidence band are marked with `*`.
pub fn correlogram_text(title: &str, correlogram: &Correlogram, max_width: usize) -> String {
    let mut result = format!(
        "{} (n={}, {:.0}% band)\n",
        title,
        correlogram.nobs,
        correlogram.confidence * 100.0
    );
    result.push_str(&"-".repeat(2 * max_width + 20));
    result.push('\n');

    for (lag, &value) in correlogram.values.iter().enumerate() {
        let bar_len = ((value.abs().min(1.0)) * max_width as f64).round() as usize;
        let (left, right) = if value < 0.0 {
            (
                format!("{}{}", " ".repeat(max_width - bar_len), "#".repeat(bar_len)),
                " ".repeat(max_width),
            )
        } else {
            (
                " ".repeat(max_width),
                format!("{}{}", "#".repeat(bar_len), " ".repeat(max_width - bar_len)),
            )
        };
        let marker = if correlogram.is_significant(lag) { '*' } else { ' ' };
        result.push_str(&format!(
            "{:>4} | {:>6.3} {} |{}|{}\n",
            lag, value, marker, left, right
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correlogram() -> Correlogram {
        Correlogram {
            values: vec![1.0, 0.5, -0.25],
            bands: vec![0.0, 0.3, 0.35],
            nobs: 40,
            confidence: 0.95,
        }
    }

    #[test]
    fn test_svg_has_a_stem_per_lag_and_a_band() {
        let svg = correlogram_svg(ACF_TITLE, &correlogram()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(ACF_TITLE));
        assert!(svg.contains("Lag"));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert_eq!(svg.matches("<polygon").count(), 1);
    }

    #[test]
    fn test_svg_without_band() {
        let lag_zero_only = Correlogram {
            values: vec![1.0],
            bands: vec![0.0],
            nobs: 2,
            confidence: 0.95,
        };
        let svg = correlogram_svg(PACF_TITLE, &lag_zero_only).unwrap();
        assert_eq!(svg.matches("<circle").count(), 1);
        assert_eq!(svg.matches("<polygon").count(), 0);
    }

    #[test]
    fn test_text_plot() {
        let text = correlogram_text(PACF_TITLE, &correlogram(), 10);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("n=40, 95% band"));
        // lag 1 is outside its band, lag 2 is not
        assert!(lines[3].contains("0.500 *"));
        assert!(lines[4].contains("-0.250  "));
        assert!(lines[2].ends_with("|##########"));
    }
}

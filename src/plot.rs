use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

const DRED: RGBColor = RGBColor(150, 0, 0);
const DBLUE: RGBColor = RGBColor(0, 0, 150);
const DGREEN: RGBColor = RGBColor(0, 150, 0);

const COLORS: [RGBColor; 9] = [BLUE, GREEN, CYAN, RED, YELLOW, MAGENTA, DRED, DBLUE, DGREEN];

/// Value range covering every point of every series, padded so flat curves stay visible.
fn value_range(series: &[(String, Vec<f64>)]) -> (f64, f64) {
    let (min, max) = series
        .iter()
        .flat_map(|(_, values)| values.iter().copied())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return (-1.0, 1.0);
    }
    let pad: f64 = ((max - min) * 0.05).max(0.5);
    (min - pad, max + pad)
}

/// Draws one curve of running-average returns per agent into a PNG at `path`.
pub fn plot_average_returns(
    path: &Path,
    title: &str,
    series: &[(String, Vec<f64>)],
) -> Result<(), Box<dyn Error>> {
    let episodes: usize = series.iter().map(|(_, v)| v.len()).max().unwrap_or(0).max(1);
    let (lo, hi) = value_range(series);

    let root = BitMapBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 40).into_font())
        .margin(5)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0..episodes, lo..hi)?;

    chart
        .configure_mesh()
        .x_desc("episode")
        .y_desc("average return")
        .draw()?;

    for (i, (label, values)) in series.iter().enumerate() {
        let color: RGBColor = COLORS[i % COLORS.len()];
        chart
            .draw_series(LineSeries::new(
                values.iter().enumerate().map(|(k, v)| (k, *v)),
                &color,
            ))?
            .label(label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_spans_all_series() {
        let series = vec![
            ("a".to_string(), vec![-10.0, -5.0]),
            ("b".to_string(), vec![-20.0, f64::NAN]),
        ];
        let (lo, hi) = value_range(&series);
        assert!(lo < -20.0 && hi > -5.0);
    }

    #[test]
    fn empty_series_get_a_default_range() {
        assert_eq!(value_range(&[]), (-1.0, 1.0));
    }
}

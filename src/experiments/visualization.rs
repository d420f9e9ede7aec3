use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

/// One named line on a chart.
pub struct LineSeriesData {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// Finds a display range covering `values`, padded so points never sit
/// on the chart border.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if (max - min).abs() < 1e-12 {
        (min - 0.5, max + 0.5)
    } else {
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }
}

/// Plots one or more line series on shared axes
///
/// A legend is drawn only when there is more than one series.
///
/// # Arguments
/// * `series` - Named point lists to draw
/// * `title` - Chart caption
/// * `x_desc` - X axis description
/// * `y_desc` - Y axis description
/// * `output_dir` - Directory to save the plot
/// * `filename` - Output file name (PNG)
///
/// # Returns
/// Ok(()) on success, or an error if plotting fails
pub fn plot_line_series(
    series: &[LineSeriesData],
    title: &str,
    x_desc: &str,
    y_desc: &str,
    output_dir: &Path,
    filename: &str,
) -> Result<(), Box<dyn Error>> {
    let output_path = output_dir.join(filename);

    let root = BitMapBackend::new(&output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_min, x_max) = padded_range(series.iter().flat_map(|s| s.points.iter().map(|p| p.0)));
    let (y_min, y_max) = padded_range(series.iter().flat_map(|s| s.points.iter().map(|p| p.1)));

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 40))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart.configure_mesh().x_desc(x_desc).y_desc(y_desc).draw()?;

    for (idx, line) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(line.points.iter().copied(), &color))?
            .label(line.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    if series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Plots side-by-side bars for several series over the same groups
///
/// Group `g` occupies the x interval `[g, g + 1)` with one bar per
/// series inside it.
///
/// # Arguments
/// * `series` - Named value lists, one value per group
/// * `title` - Chart caption
/// * `x_desc` - X axis description
/// * `y_desc` - Y axis description
/// * `output_dir` - Directory to save the plot
/// * `filename` - Output file name (PNG)
///
/// # Returns
/// Ok(()) on success, or an error if plotting fails
pub fn plot_grouped_bars(
    series: &[(String, Vec<f64>)],
    title: &str,
    x_desc: &str,
    y_desc: &str,
    output_dir: &Path,
    filename: &str,
) -> Result<(), Box<dyn Error>> {
    let output_path = output_dir.join(filename);

    let root = BitMapBackend::new(&output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let n_groups = series.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
    let y_max = series
        .iter()
        .flat_map(|(_, v)| v.iter().copied())
        .fold(0.0_f64, f64::max)
        .max(1e-9)
        * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 40))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..n_groups as f64, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_label_formatter(&|x| format!("{}", x.floor() as usize + 1))
        .draw()?;

    let bar_width = 0.8 / series.len() as f64;
    for (idx, (label, values)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(values.iter().enumerate().map(|(group, &value)| {
                let x0 = group as f64 + 0.1 + idx as f64 * bar_width;
                Rectangle::new([(x0, 0.0), (x0 + bar_width, value)], color.filled())
            }))?
            .label(label.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Plots a histogram of `values` with equal-width bins
///
/// # Arguments
/// * `values` - Samples to bin
/// * `n_bins` - Number of equal-width bins
/// * `title` - Chart caption
/// * `x_desc` - X axis description
/// * `output_dir` - Directory to save the plot
/// * `filename` - Output file name (PNG)
///
/// # Returns
/// Ok(()) on success, or an error if plotting fails
pub fn plot_histogram(
    values: &[f64],
    n_bins: usize,
    title: &str,
    x_desc: &str,
    output_dir: &Path,
    filename: &str,
) -> Result<(), Box<dyn Error>> {
    let output_path = output_dir.join(filename);

    let root = BitMapBackend::new(&output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_min, x_max) = padded_range(values.iter().copied());
    let bin_width = (x_max - x_min) / n_bins as f64;
    let mut counts = vec![0usize; n_bins];
    for &value in values {
        let bin = (((value - x_min) / bin_width) as usize).min(n_bins - 1);
        counts[bin] += 1;
    }
    let y_max = counts.iter().max().copied().unwrap_or(1).max(1) as f64 * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 40))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

    chart.configure_mesh().x_desc(x_desc).y_desc("Count").draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(bin, &count)| {
        let x0 = x_min + bin as f64 * bin_width;
        Rectangle::new([(x0, 0.0), (x0 + bin_width, count as f64)], BLUE.mix(0.5).filled())
    }))?;

    root.present()?;
    Ok(())
}

/// Plots scatter points split into named groups
///
/// # Arguments
/// * `groups` - Named point lists, one colour per group
/// * `title` - Chart caption
/// * `x_desc` - X axis description
/// * `y_desc` - Y axis description
/// * `output_dir` - Directory to save the plot
/// * `filename` - Output file name (PNG)
///
/// # Returns
/// Ok(()) on success, or an error if plotting fails
pub fn plot_scatter_groups(
    groups: &[(String, Vec<(f64, f64)>)],
    title: &str,
    x_desc: &str,
    y_desc: &str,
    output_dir: &Path,
    filename: &str,
) -> Result<(), Box<dyn Error>> {
    let output_path = output_dir.join(filename);

    let root = BitMapBackend::new(&output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_min, x_max) = padded_range(groups.iter().flat_map(|(_, p)| p.iter().map(|q| q.0)));
    let (y_min, y_max) = padded_range(groups.iter().flat_map(|(_, p)| p.iter().map(|q| q.1)));

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 40))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart.configure_mesh().x_desc(x_desc).y_desc(y_desc).draw()?;

    for (idx, (label, points)) in groups.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 3, color.filled())),
            )?
            .label(label.as_str())
            .legend(move |(x, y)| Circle::new((x + 10, y), 3, color.filled()));
    }

    if groups.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

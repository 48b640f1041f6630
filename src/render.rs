//! SVG output for a computed [`HeatMap`].
//!
//! One renderer covers every variant of the chart: tooltips, legend and axis
//! labels are switched on and off through [`RenderOptions`].

use std::fmt::Write;

use crate::error::Result;
use crate::layout::{AxisTick, HeatMap};

const TICK_SIZE: f64 = 6.0;
const LEGEND_TICK_SIZE: f64 = 10.0;
const FONT: &str = r#"font-family="sans-serif" font-size="10""#;

/// Which optional parts of the chart to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Attach the tooltip text to each cell as an SVG `<title>`
    pub show_tooltip: bool,
    pub show_legend: bool,
    /// Draw the "Years" and "Months" axis titles
    pub show_labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            show_tooltip: true,
            show_legend: true,
            show_labels: true,
        }
    }
}

/// Renders the heat map as a standalone SVG document.
///
/// # Examples
///
/// ```rust
/// use heatmap::{render_svg, Dataset, HeatMap, HeatMapConfig, RenderOptions, TemperatureRecord};
///
/// let dataset = Dataset::new(8.0, vec![TemperatureRecord::new(1900, 1, 0.5)]).unwrap();
/// let heat_map = HeatMap::compute(&dataset, &HeatMapConfig::default()).unwrap();
///
/// let options = RenderOptions { show_legend: false, ..RenderOptions::default() };
/// let svg = render_svg(&heat_map, &options).unwrap();
///
/// assert!(svg.starts_with("<svg"));
/// assert!(svg.contains(r#"data-year="1900""#));
/// assert!(!svg.contains(r#"id="legend""#));
/// ```
pub fn render_svg(heat_map: &HeatMap, options: &RenderOptions) -> Result<String> {
    let config = &heat_map.config;
    let mut svg = String::new();

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        config.width, config.height, config.width, config.height
    )?;
    writeln!(svg, r#"  <title id="title">{}</title>"#, escape(&heat_map.title))?;
    writeln!(
        svg,
        r#"  <desc id="description">{}</desc>"#,
        escape(&heat_map.description)
    )?;

    write_cells(&mut svg, heat_map, options.show_tooltip)?;
    write_x_axis(&mut svg, heat_map)?;
    write_y_axis(&mut svg, heat_map)?;
    if options.show_labels {
        write_axis_labels(&mut svg, heat_map)?;
    }
    if options.show_legend {
        write_legend(&mut svg, heat_map)?;
    }

    svg.push_str("</svg>\n");

    log::info!(
        "rendered {} cells into {} bytes of svg",
        heat_map.cells.len(),
        svg.len()
    );
    Ok(svg)
}

fn write_cells(svg: &mut String, heat_map: &HeatMap, show_tooltip: bool) -> Result<()> {
    writeln!(svg, r#"  <g class="map">"#)?;
    for cell in &heat_map.cells {
        write!(
            svg,
            r#"    <rect class="cell" data-month="{}" data-year="{}" data-temp="{}" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}""#,
            cell.month_index,
            cell.year,
            cell.temperature,
            cell.x,
            cell.y,
            cell.width,
            cell.height,
            cell.color
        )?;
        if show_tooltip {
            let tooltip = cell.tooltip();
            writeln!(
                svg,
                "><title>{}</title></rect>",
                escape(&tooltip.lines().join("\n"))
            )?;
        } else {
            writeln!(svg, "/>")?;
        }
    }
    writeln!(svg, "  </g>")?;
    Ok(())
}

fn write_x_axis(svg: &mut String, heat_map: &HeatMap) -> Result<()> {
    let config = &heat_map.config;
    let range = config.x_range();

    writeln!(
        svg,
        r#"  <g id="x-axis" transform="translate(0,{})" {FONT} text-anchor="middle">"#,
        config.height - config.margin.bottom
    )?;
    writeln!(
        svg,
        r#"    <path stroke="black" d="M{:.2},0H{:.2}"/>"#,
        range.start, range.end
    )?;
    write_ticks(svg, &heat_map.x_ticks, |tick, svg| {
        writeln!(
            svg,
            r#"    <g class="tick" transform="translate({:.2},0)"><line stroke="black" y2="{TICK_SIZE}"/><text y="{}" dy="0.71em">{}</text></g>"#,
            tick.position,
            TICK_SIZE + 3.0,
            escape(&tick.label)
        )
    })?;
    writeln!(svg, "  </g>")?;
    Ok(())
}

fn write_y_axis(svg: &mut String, heat_map: &HeatMap) -> Result<()> {
    let config = &heat_map.config;
    let range = config.y_range();

    writeln!(
        svg,
        r#"  <g id="y-axis" transform="translate({},0)" {FONT} text-anchor="end">"#,
        config.margin.left
    )?;
    writeln!(
        svg,
        r#"    <path stroke="black" d="M0,{:.2}V{:.2}"/>"#,
        range.start, range.end
    )?;
    write_ticks(svg, &heat_map.y_ticks, |tick, svg| {
        writeln!(
            svg,
            r#"    <g class="tick" transform="translate(0,{:.2})"><line stroke="black" x2="-{TICK_SIZE}"/><text x="-{}" dy="0.32em">{}</text></g>"#,
            tick.position,
            TICK_SIZE + 3.0,
            escape(&tick.label)
        )
    })?;
    writeln!(svg, "  </g>")?;
    Ok(())
}

fn write_ticks<F>(svg: &mut String, ticks: &[AxisTick], mut write_tick: F) -> Result<()>
where
    F: FnMut(&AxisTick, &mut String) -> std::fmt::Result,
{
    for tick in ticks {
        write_tick(tick, svg)?;
    }
    Ok(())
}

fn write_axis_labels(svg: &mut String, heat_map: &HeatMap) -> Result<()> {
    let config = &heat_map.config;
    let margin = &config.margin;
    let plot_width = config.width - margin.left - margin.right;
    let plot_height = config.height - margin.top - margin.bottom;

    writeln!(
        svg,
        r#"  <text class="x-label" x="{:.2}" y="{:.2}" text-anchor="middle" font-size="14">Years</text>"#,
        plot_width / 2.0 + margin.left,
        config.height - margin.bottom + 40.0
    )?;
    writeln!(
        svg,
        r#"  <text class="y-label" transform="rotate(-90)" x="{:.2}" y="20" text-anchor="middle" font-size="14">Months</text>"#,
        -plot_height / 2.0 - margin.top
    )?;
    Ok(())
}

fn write_legend(svg: &mut String, heat_map: &HeatMap) -> Result<()> {
    let config = &heat_map.config;
    let legend = &heat_map.legend;

    writeln!(
        svg,
        r#"  <g id="legend" class="legend" transform="translate({},{:.2})">"#,
        config.margin.left,
        config.height - config.margin.bottom + 56.0
    )?;
    writeln!(svg, "    <g>")?;
    for swatch in &legend.swatches {
        writeln!(
            svg,
            r#"      <rect x="{:.2}" y="0" width="{:.2}" height="{}" fill="{}" stroke="black"/>"#,
            swatch.x, swatch.width, legend.height, swatch.bucket.color
        )?;
    }
    writeln!(svg, "    </g>")?;

    writeln!(
        svg,
        r#"    <g transform="translate(0,{})" {FONT} text-anchor="middle">"#,
        legend.height
    )?;
    writeln!(
        svg,
        r#"      <path stroke="black" d="M0,0H{:.2}"/>"#,
        legend.width
    )?;
    for tick in &legend.ticks {
        writeln!(
            svg,
            r#"      <g class="tick" transform="translate({:.2},0)"><line stroke="black" y2="{LEGEND_TICK_SIZE}"/><text y="{}" dy="0.71em">{}</text></g>"#,
            tick.position,
            LEGEND_TICK_SIZE + 3.0,
            escape(&tick.label)
        )?;
    }
    writeln!(svg, "    </g>")?;
    writeln!(svg, "  </g>")?;
    Ok(())
}

/// Escapes text for use inside SVG element content or attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, TemperatureRecord};
    use crate::layout::HeatMapConfig;

    fn heat_map() -> HeatMap {
        let records = (1890..1912)
            .flat_map(|year| {
                (1..=12).map(move |month| {
                    TemperatureRecord::new(year, month, (year - 1900) as f64 * 0.1 - month as f64 * 0.05)
                })
            })
            .collect();
        let dataset = Dataset::new(8.66, records).unwrap();
        HeatMap::compute(&dataset, &HeatMapConfig::default()).unwrap()
    }

    #[test]
    fn full_render_has_every_part() {
        let svg = render_svg(&heat_map(), &RenderOptions::default()).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches(r#"class="cell""#).count(), 22 * 12);
        assert!(svg.contains(r#"id="x-axis""#));
        assert!(svg.contains(r#"id="y-axis""#));
        assert!(svg.contains(r#"id="legend""#));
        assert!(svg.contains(">Years</text>"));
        assert!(svg.contains(">Months</text>"));
        assert!(svg.contains("<title>1890 - January\n"));
        assert!(svg.contains(">1900</text>"));
        assert!(svg.contains(">December</text>"));
    }

    #[test]
    fn options_switch_parts_off() {
        let options = RenderOptions {
            show_tooltip: false,
            show_legend: false,
            show_labels: false,
        };
        let svg = render_svg(&heat_map(), &options).unwrap();

        assert_eq!(svg.matches(r#"class="cell""#).count(), 22 * 12);
        assert!(!svg.contains("</rect>"));
        assert!(!svg.contains(r#"id="legend""#));
        assert!(!svg.contains(">Years</text>"));
        assert!(svg.contains(r#"id="x-axis""#));
    }

    #[test]
    fn cells_carry_zero_based_month() {
        let svg = render_svg(&heat_map(), &RenderOptions::default()).unwrap();

        assert!(svg.contains(r#"data-month="0" data-year="1890""#));
        assert!(svg.contains(r#"data-month="11" data-year="1911""#));
        assert!(!svg.contains(r#"data-month="12""#));
    }

    #[test]
    fn legend_has_swatch_per_bucket() {
        let map = heat_map();
        let svg = render_svg(&map, &RenderOptions::default()).unwrap();

        for color in map.color_scale.palette() {
            assert!(svg.contains(&format!(r#"fill="{color}" stroke="black""#)));
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<a & 'b' "c">"#), "&lt;a &amp; &apos;b&apos; &quot;c&quot;&gt;");
        assert_eq!(escape("8.66\u{2103}"), "8.66\u{2103}");
    }
}

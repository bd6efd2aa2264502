// Chart builders - Pure functions from data + style to chart descriptions
use crate::application::datasets::SleepDay;
use crate::domain::chart::{
    Annotation, Axis, AxisTitle, BoxTrace, ColorBar, Figure, Font, HeatmapTrace, Layout, Legend,
    LineStyleSpec, Margin, Marker, Orientation, PieMarker, PieTrace, PlacedWord, ProgressBar,
    ScatterTrace, Trace, Transition, WordCloud,
};
use crate::domain::grid::CategoryGrid;
use crate::domain::percent::PercentValue;
use crate::domain::time_series::SeriesPoint;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn format_dates<V>(points: &[SeriesPoint<NaiveDate, V>]) -> Vec<String> {
    points
        .iter()
        .map(|p| p.key.format(DATE_FORMAT).to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub fill_color: String,
    pub line_width: f64,
    pub marker_size: f64,
    pub grid_color: String,
    pub axis_color: String,
    pub tick_color: String,
    pub tick_size: u32,
    pub tick_suffix: Option<String>,
    pub height: u32,
    pub margin: Margin,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: "#0ea5e9".to_string(),
            fill_color: "rgba(14,165,233,0.15)".to_string(),
            line_width: 4.0,
            marker_size: 9.0,
            grid_color: "rgba(15,23,42,0.08)".to_string(),
            axis_color: "rgba(15,23,42,0.20)".to_string(),
            tick_color: "rgba(15,23,42,0.70)".to_string(),
            tick_size: 12,
            tick_suffix: None,
            height: 260,
            margin: Margin::new(50, 20, 10, 40),
        }
    }
}

impl LineStyle {
    fn axis(&self) -> Axis {
        Axis {
            title: Some(AxisTitle::new("")),
            showgrid: Some(true),
            gridcolor: Some(self.grid_color.clone()),
            zeroline: Some(false),
            showline: Some(true),
            linecolor: Some(self.axis_color.clone()),
            tickfont: Some(Font {
                size: self.tick_size,
                color: self.tick_color.clone(),
            }),
            ticksuffix: self.tick_suffix.clone(),
            ..Axis::default()
        }
    }
}

/// Single filled line with markers, no legend.
pub fn line_area_chart(points: &[SeriesPoint<String, f64>], style: &LineStyle) -> Figure {
    let trace = ScatterTrace {
        x: points.iter().map(|p| p.key.clone()).collect(),
        y: points.iter().map(|p| p.value).collect(),
        mode: "lines+markers".to_string(),
        name: String::new(),
        line: Some(LineStyleSpec {
            color: style.color.clone(),
            width: Some(style.line_width),
        }),
        marker: Some(Marker {
            size: Some(style.marker_size),
            color: Some(style.color.clone()),
        }),
        fill: Some("tozeroy".to_string()),
        fillcolor: Some(style.fill_color.clone()),
        stackgroup: None,
        hovertemplate: Some("%{x}<br>%{y}<extra></extra>".to_string()),
    };

    Figure {
        data: vec![Trace::Scatter(trace)],
        layout: Layout {
            height: Some(style.height),
            margin: Some(style.margin),
            paper_bgcolor: Some("white".to_string()),
            plot_bgcolor: Some("white".to_string()),
            showlegend: Some(false),
            xaxis: Some(style.axis()),
            yaxis: Some(style.axis()),
            ..Layout::default()
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlotStyle {
    pub transition_ms: u32,
    pub x_title: String,
    pub y_title: String,
}

impl Default for BoxPlotStyle {
    fn default() -> Self {
        Self {
            transition_ms: 500,
            x_title: "Date".to_string(),
            y_title: "Value".to_string(),
        }
    }
}

/// One box per distinct date; the renderer groups `y` by `x`.
pub fn box_plot(points: &[SeriesPoint<NaiveDate, f64>], style: &BoxPlotStyle) -> Figure {
    let trace = BoxTrace {
        x: format_dates(points),
        y: points.iter().map(|p| p.value).collect(),
        marker: None,
    };

    Figure {
        data: vec![Trace::Box(trace)],
        layout: Layout {
            xaxis: Some(Axis {
                title: Some(AxisTitle::new(style.x_title.clone())),
                ..Axis::default()
            }),
            yaxis: Some(Axis {
                title: Some(AxisTitle::new(style.y_title.clone())),
                ..Axis::default()
            }),
            transition: Some(Transition {
                duration: style.transition_ms,
            }),
            ..Layout::default()
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackedAreaStyle {
    pub sleep_name: String,
    pub active_name: String,
    pub sleep_color: String,
    pub active_color: String,
    pub x_title: String,
    pub y_title: String,
    pub y_range: [f64; 2],
}

impl Default for StackedAreaStyle {
    fn default() -> Self {
        Self {
            sleep_name: "Sleep".to_string(),
            active_name: "Active".to_string(),
            sleep_color: "skyblue".to_string(),
            active_color: "orange".to_string(),
            x_title: "Date".to_string(),
            y_title: "Hours".to_string(),
            y_range: [0.0, 24.0],
        }
    }
}

/// Sleep and active hours stacked in one group so each day sums to 24.
pub fn stacked_area_chart(points: &[SeriesPoint<NaiveDate, SleepDay>], style: &StackedAreaStyle) -> Figure {
    let dates = format_dates(points);
    let stacked = |name: &str, color: &str, pick: fn(&SleepDay) -> f64| ScatterTrace {
        x: dates.clone(),
        y: points.iter().map(|p| pick(&p.value)).collect(),
        mode: "lines".to_string(),
        name: name.to_string(),
        line: Some(LineStyleSpec {
            color: color.to_string(),
            width: None,
        }),
        marker: None,
        fill: None,
        fillcolor: None,
        stackgroup: Some("one".to_string()),
        hovertemplate: None,
    };

    Figure {
        data: vec![
            Trace::Scatter(stacked(&style.sleep_name, &style.sleep_color, |d| d.sleep)),
            Trace::Scatter(stacked(&style.active_name, &style.active_color, |d| d.active)),
        ],
        layout: Layout {
            xaxis: Some(Axis {
                title: Some(AxisTitle::new(style.x_title.clone())),
                ..Axis::default()
            }),
            yaxis: Some(Axis {
                title: Some(AxisTitle::new(style.y_title.clone())),
                range: Some(style.y_range),
                ..Axis::default()
            }),
            legend: Some(Legend {
                orientation: "h".to_string(),
                yanchor: "bottom".to_string(),
                y: 1.1,
                xanchor: "center".to_string(),
                x: 0.5,
            }),
            ..Layout::default()
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapStyle {
    pub colorscale: String,
    pub colorbar_title: String,
    pub x_title: String,
    pub y_title: String,
    /// Draw the first row at the top.
    pub first_row_on_top: bool,
}

impl Default for HeatmapStyle {
    fn default() -> Self {
        Self {
            colorscale: "Blues".to_string(),
            colorbar_title: "Score".to_string(),
            x_title: "Weekday".to_string(),
            y_title: "Week".to_string(),
            first_row_on_top: true,
        }
    }
}

pub fn heatmap(grid: &CategoryGrid, style: &HeatmapStyle) -> Figure {
    let trace = HeatmapTrace {
        z: grid.matrix(),
        x: grid.columns().to_vec(),
        y: grid.rows().to_vec(),
        colorscale: style.colorscale.clone(),
        colorbar: ColorBar {
            title: AxisTitle::new(style.colorbar_title.clone()),
        },
    };

    Figure {
        data: vec![Trace::Heatmap(trace)],
        layout: Layout {
            xaxis: Some(Axis {
                title: Some(AxisTitle::new(style.x_title.clone())),
                ..Axis::default()
            }),
            yaxis: Some(Axis {
                title: Some(AxisTitle::new(style.y_title.clone())),
                autorange: style.first_row_on_top.then(|| "reversed".to_string()),
                ..Axis::default()
            }),
            ..Layout::default()
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RingStyle {
    pub color: String,
    pub rest_color: String,
    /// Fraction of the radius cut out; larger means a thinner ring.
    pub hole: f64,
    pub rotation: f64,
    pub height: u32,
    pub width: Option<u32>,
    pub label_size: u32,
    pub label_color: String,
}

impl RingStyle {
    /// Blue ring starting at twelve o'clock.
    pub fn innovation() -> Self {
        Self {
            color: "#1f77b4".to_string(),
            rest_color: "#9bd5d6".to_string(),
            hole: 0.82,
            rotation: 90.0,
            height: 220,
            width: None,
            label_size: 40,
            label_color: "#111827".to_string(),
        }
    }

    /// Thin amber ring starting near the bottom.
    pub fn execution_speed() -> Self {
        Self {
            color: "#f59e0b".to_string(),
            rest_color: "#fde68a".to_string(),
            hole: 0.86,
            rotation: 270.0,
            height: 160,
            width: Some(200),
            label_size: 44,
            label_color: "#111827".to_string(),
        }
    }
}

impl Default for RingStyle {
    fn default() -> Self {
        Self::innovation()
    }
}

pub fn ring_gauge(percent: PercentValue, style: &RingStyle) -> Figure {
    let trace = PieTrace {
        values: vec![f64::from(percent.get()), f64::from(percent.remainder())],
        hole: style.hole,
        sort: false,
        direction: "clockwise".to_string(),
        rotation: style.rotation,
        textinfo: "none".to_string(),
        hoverinfo: "skip".to_string(),
        marker: PieMarker {
            colors: vec![style.color.clone(), style.rest_color.clone()],
            line: LineStyleSpec {
                color: "white".to_string(),
                width: Some(2.0),
            },
        },
        showlegend: false,
    };

    Figure {
        data: vec![Trace::Pie(trace)],
        layout: Layout {
            height: Some(style.height),
            width: style.width,
            margin: Some(Margin::zero()),
            paper_bgcolor: Some("white".to_string()),
            plot_bgcolor: Some("white".to_string()),
            annotations: vec![Annotation {
                text: format!("<b>{percent}</b>"),
                x: 0.5,
                y: 0.5,
                showarrow: false,
                font: Font {
                    size: style.label_size,
                    color: style.label_color.clone(),
                },
            }],
            ..Layout::default()
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressStyle {
    pub track_color: String,
    pub fill_from: String,
    pub fill_to: String,
    pub track_height_px: u32,
    pub label_font_px: u32,
}

impl Default for ProgressStyle {
    fn default() -> Self {
        Self {
            track_color: "#d1d5db".to_string(),
            fill_from: "#38bdf8".to_string(),
            fill_to: "#0ea5e9".to_string(),
            track_height_px: 12,
            label_font_px: 44,
        }
    }
}

pub fn progress_bar(percent: PercentValue, style: &ProgressStyle) -> ProgressBar {
    ProgressBar {
        percent: percent.get(),
        fill_width: percent.to_string(),
        label: percent.to_string(),
        aria_valuemin: 0,
        aria_valuemax: 100,
        track_color: style.track_color.clone(),
        fill_gradient: [style.fill_from.clone(), style.fill_to.clone()],
        track_height_px: style.track_height_px,
        label_font_px: style.label_font_px,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordCloudStyle {
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub min_font: f64,
    pub max_font: f64,
    /// Share of words laid out horizontally.
    pub prefer_horizontal: f64,
    pub seed: u64,
}

impl Default for WordCloudStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 320,
            background: "white".to_string(),
            min_font: 12.0,
            max_font: 72.0,
            prefer_horizontal: 0.8,
            seed: 42,
        }
    }
}

/// Heaviest term first; ties broken alphabetically. Font size grows
/// linearly with weight relative to the heaviest term.
pub fn word_cloud(terms: &[(String, u32)], style: &WordCloudStyle) -> WordCloud {
    let mut sorted: Vec<&(String, u32)> = terms.iter().filter(|(_, w)| *w > 0).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let heaviest = sorted.first().map(|(_, w)| f64::from(*w)).unwrap_or(1.0);
    let mut rng = StdRng::seed_from_u64(style.seed);

    let words = sorted
        .into_iter()
        .map(|(text, weight)| {
            let scale = f64::from(*weight) / heaviest;
            let font_size = style.min_font + (style.max_font - style.min_font) * scale;
            let orientation = if rng.gen_bool(style.prefer_horizontal.clamp(0.0, 1.0)) {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            PlacedWord {
                text: text.clone(),
                weight: *weight,
                font_size: (font_size * 10.0).round() / 10.0,
                orientation,
            }
        })
        .collect();

    WordCloud {
        width: style.width,
        height: style.height,
        background: style.background.clone(),
        words,
    }
}

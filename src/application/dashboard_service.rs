// Dashboard service - Builds the widget catalog and serves widget state
use crate::application::chart_builders::{
    BoxPlotStyle, HeatmapStyle, LineStyle, ProgressStyle, RingStyle, StackedAreaStyle,
    WordCloudStyle, box_plot, heatmap, line_area_chart, progress_bar, ring_gauge,
    stacked_area_chart, word_cloud,
};
use crate::application::controller::{ControlSpec, ControllerState, WidgetController, WidgetDefinition};
use crate::application::datasets::{
    RandomDraw, SleepDay, daily_scores, feedback_terms, heart_rate_series, sleep_log,
    weekly_sleep_cells,
};
use crate::application::registry::{PageComposer, WidgetRegistry};
use crate::domain::chart::{WidgetView, Figure};
use crate::domain::control::{ControlValue, ControlValues};
use crate::domain::dashboard::Page;
use crate::domain::error::DashboardError;
use crate::domain::grid::CategoryGrid;
use crate::domain::percent::PercentValue;
use crate::domain::time_series::{DailySeries, SeriesPoint, filter_by_optional_range};
use crate::infrastructure::config::{AppConfig, ReadingsConfig, WidgetsConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

pub const START_DATE: &str = "date-picker.start_date";
pub const END_DATE: &str = "date-picker.end_date";
pub const WORD_CLOUD_TICK: &str = "wc-tick.n_intervals";

const WORD_CLOUD_REFRESH: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Serialize)]
pub struct WidgetSummary {
    pub id: String,
    pub title: String,
    pub reactive: bool,
    pub refresh_ms: Option<u64>,
    pub controls: Vec<ControlSpec>,
}

impl WidgetSummary {
    fn from_definition(definition: &WidgetDefinition) -> Self {
        Self {
            id: definition.id.clone(),
            title: definition.title.clone(),
            reactive: definition.is_reactive(),
            refresh_ms: definition
                .refresh_interval
                .map(|d| d.as_millis() as u64),
            controls: definition.controls.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WidgetState {
    pub id: String,
    pub title: String,
    pub state: ControllerState,
    pub controls: ControlValues,
    pub outputs: BTreeMap<String, WidgetView>,
    pub updated: Vec<String>,
}

impl WidgetState {
    fn from_controller(controller: WidgetController, updated: Vec<String>) -> Self {
        Self {
            id: controller.id().to_string(),
            title: controller.title().to_string(),
            state: controller.state(),
            controls: controller.values().clone(),
            outputs: controller.outputs().clone(),
            updated,
        }
    }
}

#[derive(Clone)]
pub struct DashboardService {
    registry: Arc<WidgetRegistry>,
    pages: Arc<PageComposer>,
}

impl DashboardService {
    /// Fails when a page references a widget that is not registered or its
    /// path collides with a built-in route or the static mount.
    pub fn new(registry: WidgetRegistry, pages: Vec<Page>, static_url: &str) -> Result<Self, DashboardError> {
        let pages = PageComposer::compose(&registry, pages, static_url)?;
        Ok(Self {
            registry: Arc::new(registry),
            pages: Arc::new(pages),
        })
    }

    pub fn from_config(app_config: &AppConfig, widgets_config: &WidgetsConfig) -> Result<Self, DashboardError> {
        let mut rng = match app_config.datasets.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let registry = build_catalog(&widgets_config.readings, &mut rng)?;
        let pages = widgets_config
            .pages
            .iter()
            .map(|p| Page::new(p.path.clone(), p.title.clone(), p.widgets.clone()))
            .collect();
        Self::new(registry, pages, &app_config.server.static_url)
    }

    pub fn widgets(&self) -> Vec<WidgetSummary> {
        self.registry
            .iter()
            .map(|d| WidgetSummary::from_definition(d))
            .collect()
    }

    pub fn widget_summary(&self, id: &str) -> Result<WidgetSummary, DashboardError> {
        let definition = self.definition(id)?;
        Ok(WidgetSummary::from_definition(&definition))
    }

    /// Widget as first displayed, with its initial control values.
    pub fn widget_state(&self, id: &str) -> Result<WidgetState, DashboardError> {
        let controller = WidgetController::new(self.definition(id)?)?;
        Ok(WidgetState::from_controller(controller, Vec::new()))
    }

    /// Fresh controller per call, so concurrent sessions never share chart state.
    pub fn update_widget(
        &self,
        id: &str,
        changes: BTreeMap<String, ControlValue>,
    ) -> Result<WidgetState, DashboardError> {
        let mut controller = WidgetController::new(self.definition(id)?)?;
        let updated = controller.apply(changes)?;
        Ok(WidgetState::from_controller(controller, updated))
    }

    pub fn page(&self, path: &str) -> Option<&Page> {
        self.pages.page(path)
    }

    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.pages()
    }

    fn definition(&self, id: &str) -> Result<Arc<WidgetDefinition>, DashboardError> {
        self.registry
            .get(id)
            .ok_or_else(|| DashboardError::WidgetNotFound(id.to_string()))
    }
}

/// Every widget the dashboard knows about, datasets drawn from `rng`.
pub fn build_catalog(readings: &ReadingsConfig, rng: &mut StdRng) -> Result<WidgetRegistry, DashboardError> {
    let scores = daily_scores(&RandomDraw::daily_scores(), rng)?;
    let sleep = sleep_log(&RandomDraw::sleep_hours(), rng)?;

    let mut registry = WidgetRegistry::new();
    registry.register(heart_rate_widget()?)?;
    registry.register(daily_scores_widget(scores)?)?;
    registry.register(sleep_widget(sleep)?)?;
    registry.register(sleep_weekly_widget()?)?;
    registry.register(ring_widget(
        "innovation-gauge",
        "Innovation",
        readings.innovation,
        RingStyle::innovation(),
    )?)?;
    registry.register(ring_widget(
        "execution-speed",
        "Execution Speed",
        readings.execution_speed,
        RingStyle::execution_speed(),
    )?)?;
    registry.register(progress_widget(readings.progress)?)?;
    registry.register(word_cloud_widget()?)?;
    Ok(registry)
}

fn figure(figure: Figure) -> WidgetView {
    WidgetView::Figure(figure)
}

fn heart_rate_widget() -> Result<WidgetDefinition, DashboardError> {
    let series = heart_rate_series()?;
    let view = figure(line_area_chart(series.points(), &LineStyle::default()));
    Ok(WidgetDefinition::builder("heart-rate", "Heart Rate")
        .fixed_output("line-plot.figure", view)
        .build()?)
}

/// Date-range slice of `series`; a cleared picker leaves that side open.
fn picked_range<V: Clone>(
    series: &DailySeries<V>,
    values: &ControlValues,
) -> Result<Vec<SeriesPoint<chrono::NaiveDate, V>>, DashboardError> {
    let start = values.date(START_DATE)?;
    let end = values.date(END_DATE)?;
    Ok(filter_by_optional_range(series.points(), start.as_ref(), end.as_ref()))
}

fn daily_scores_widget(series: DailySeries<f64>) -> Result<WidgetDefinition, DashboardError> {
    let style = BoxPlotStyle::default();
    Ok(WidgetDefinition::builder("daily-scores", "Daily Scores")
        .control(START_DATE, *series.first_key())
        .control(END_DATE, *series.last_key())
        .output("box-plot.figure", &[START_DATE, END_DATE], move |values| {
            let points = picked_range(&series, values)?;
            Ok(figure(box_plot(&points, &style)))
        })
        .build()?)
}

fn sleep_widget(series: DailySeries<SleepDay>) -> Result<WidgetDefinition, DashboardError> {
    let style = StackedAreaStyle::default();
    Ok(WidgetDefinition::builder("sleep", "Sleep")
        .control(START_DATE, *series.first_key())
        .control(END_DATE, *series.last_key())
        .output("area-chart.figure", &[START_DATE, END_DATE], move |values| {
            let points = picked_range(&series, values)?;
            Ok(figure(stacked_area_chart(&points, &style)))
        })
        .build()?)
}

fn sleep_weekly_widget() -> Result<WidgetDefinition, DashboardError> {
    let grid = CategoryGrid::pivot(&weekly_sleep_cells())?;
    let view = figure(heatmap(&grid, &HeatmapStyle::default()));
    Ok(WidgetDefinition::builder("sleep-weekly", "Weekly Sleep")
        .fixed_output("heatmap.figure", view)
        .build()?)
}

fn ring_widget(id: &str, title: &str, reading: f64, style: RingStyle) -> Result<WidgetDefinition, DashboardError> {
    let view = figure(ring_gauge(PercentValue::new(reading), &style));
    Ok(WidgetDefinition::builder(id, title)
        .fixed_output(format!("{id}.figure"), view)
        .build()?)
}

fn progress_widget(reading: f64) -> Result<WidgetDefinition, DashboardError> {
    let view = WidgetView::ProgressBar(progress_bar(
        PercentValue::new(reading),
        &ProgressStyle::default(),
    ));
    Ok(WidgetDefinition::builder("progress", "Progress")
        .fixed_output("progress.bar", view)
        .build()?)
}

fn word_cloud_widget() -> Result<WidgetDefinition, DashboardError> {
    let style = WordCloudStyle::default();
    Ok(WidgetDefinition::builder("feedback-word-cloud", "Feedback")
        .control(WORD_CLOUD_TICK, 0_i64)
        .refresh_every(WORD_CLOUD_REFRESH)
        .output("wc-image.cloud", &[WORD_CLOUD_TICK], move |values| {
            let tick = values.integer(WORD_CLOUD_TICK)?.unwrap_or_default();
            tracing::debug!("Rebuilding word cloud on tick {}", tick);
            Ok(WidgetView::WordCloud(word_cloud(&feedback_terms(), &style)))
        })
        .build()?)
}

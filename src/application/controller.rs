// Widget controller - Binds named controls to chart builders and recomputes on change
use crate::domain::chart::WidgetView;
use crate::domain::control::{ControlValue, ControlValues};
use crate::domain::error::{ConfigurationError, DashboardError};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Pure function from the current control values to one output.
pub type OutputFn = Arc<dyn Fn(&ControlValues) -> Result<WidgetView, DashboardError> + Send + Sync>;

#[derive(Clone)]
pub struct Binding {
    pub inputs: Vec<String>,
    compute: OutputFn,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("inputs", &self.inputs)
            .finish_non_exhaustive()
    }
}

/// `{output_id: (input_ids, function)}`. Each output has exactly one binding.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    bindings: BTreeMap<String, Binding>,
}

impl Dispatcher {
    /// Outputs whose inputs intersect `changed`, in output id order.
    pub fn bound_to<'a>(&'a self, changed: &'a BTreeSet<String>) -> impl Iterator<Item = (&'a String, &'a Binding)> + 'a {
        self.bindings
            .iter()
            .filter(move |(_, b)| b.inputs.iter().any(|i| changed.contains(i)))
    }

    pub fn all(&self) -> impl Iterator<Item = (&String, &Binding)> {
        self.bindings.iter()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ControlSpec {
    pub id: String,
    pub initial: ControlValue,
}

/// Immutable description of one widget. Shared by every controller built from it.
#[derive(Debug, Clone)]
pub struct WidgetDefinition {
    pub id: String,
    pub title: String,
    pub controls: Vec<ControlSpec>,
    /// How often the client should bump the widget's tick control.
    pub refresh_interval: Option<Duration>,
    dispatcher: Dispatcher,
}

impl WidgetDefinition {
    pub fn builder(id: impl Into<String>, title: impl Into<String>) -> WidgetDefinitionBuilder {
        WidgetDefinitionBuilder {
            id: id.into(),
            title: title.into(),
            controls: Vec::new(),
            refresh_interval: None,
            outputs: Vec::new(),
        }
    }

    pub fn is_reactive(&self) -> bool {
        self.dispatcher.all().any(|(_, b)| !b.inputs.is_empty())
    }

    fn initial_values(&self) -> ControlValues {
        let mut values = ControlValues::new();
        for control in &self.controls {
            values.insert(control.id.clone(), control.initial.clone());
        }
        values
    }
}

pub struct WidgetDefinitionBuilder {
    id: String,
    title: String,
    controls: Vec<ControlSpec>,
    refresh_interval: Option<Duration>,
    outputs: Vec<(String, Binding)>,
}

impl WidgetDefinitionBuilder {
    pub fn control(mut self, id: impl Into<String>, initial: impl Into<ControlValue>) -> Self {
        self.controls.push(ControlSpec {
            id: id.into(),
            initial: initial.into(),
        });
        self
    }

    pub fn refresh_every(mut self, interval: Duration) -> Self {
        self.refresh_interval = Some(interval);
        self
    }

    pub fn output<F>(mut self, id: impl Into<String>, inputs: &[&str], compute: F) -> Self
    where
        F: Fn(&ControlValues) -> Result<WidgetView, DashboardError> + Send + Sync + 'static,
    {
        self.outputs.push((
            id.into(),
            Binding {
                inputs: inputs.iter().map(|i| i.to_string()).collect(),
                compute: Arc::new(compute),
            },
        ));
        self
    }

    /// Output with no inputs; computed once when a controller starts.
    pub fn fixed_output(self, id: impl Into<String>, view: WidgetView) -> Self {
        self.output(id, &[], move |_| Ok(view.clone()))
    }

    pub fn build(self) -> Result<WidgetDefinition, ConfigurationError> {
        let mut declared = BTreeSet::new();
        for control in &self.controls {
            if !declared.insert(control.id.clone()) {
                return Err(ConfigurationError::DuplicateControl {
                    widget: self.id,
                    control: control.id.clone(),
                });
            }
        }

        let mut bindings = BTreeMap::new();
        for (output, binding) in self.outputs {
            if let Some(control) = binding.inputs.iter().find(|i| !declared.contains(*i)) {
                return Err(ConfigurationError::UndeclaredControl {
                    widget: self.id,
                    output,
                    control: control.clone(),
                });
            }
            if bindings.contains_key(&output) {
                return Err(ConfigurationError::DuplicateOutput {
                    widget: self.id,
                    output,
                });
            }
            bindings.insert(output, binding);
        }

        Ok(WidgetDefinition {
            id: self.id,
            title: self.title,
            controls: self.controls,
            refresh_interval: self.refresh_interval,
            dispatcher: Dispatcher { bindings },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    Idle,
    Recomputing,
}

/// Per-request view of a widget: its control values and the outputs they produced.
#[derive(Debug, Clone)]
pub struct WidgetController {
    definition: Arc<WidgetDefinition>,
    values: ControlValues,
    outputs: BTreeMap<String, WidgetView>,
    state: ControllerState,
}

impl WidgetController {
    /// Run every binding once with the initial control values.
    pub fn new(definition: Arc<WidgetDefinition>) -> Result<Self, DashboardError> {
        let values = definition.initial_values();
        let outputs = definition
            .dispatcher
            .all()
            .map(|(id, binding)| Ok((id.clone(), (binding.compute)(&values)?)))
            .collect::<Result<BTreeMap<_, _>, DashboardError>>()?;

        Ok(Self {
            definition,
            values,
            outputs,
            state: ControllerState::Idle,
        })
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn title(&self) -> &str {
        &self.definition.title
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn values(&self) -> &ControlValues {
        &self.values
    }

    pub fn outputs(&self) -> &BTreeMap<String, WidgetView> {
        &self.outputs
    }

    /// Store the new values and recompute each affected output once.
    ///
    /// A control repeated in `changes` keeps its last value. Returns the ids
    /// of the replaced outputs. If any builder fails, values and outputs are
    /// left as they were.
    pub fn apply(
        &mut self,
        changes: impl IntoIterator<Item = (String, ControlValue)>,
    ) -> Result<Vec<String>, DashboardError> {
        let changes: Vec<(String, ControlValue)> = changes.into_iter().collect();
        if let Some((control, _)) = changes.iter().find(|(c, _)| !self.values.contains(c)) {
            return Err(DashboardError::UnknownControl {
                widget: self.definition.id.clone(),
                control: control.clone(),
            });
        }
        if changes.is_empty() {
            return Ok(Vec::new());
        }

        self.state = ControllerState::Recomputing;
        let previous = self.values.clone();
        let changed: BTreeSet<String> = changes.iter().map(|(c, _)| c.clone()).collect();
        for (control, value) in changes {
            self.values.insert(control, value);
        }

        let result = self.recompute(&changed);
        self.state = ControllerState::Idle;

        let fresh = match result {
            Ok(fresh) => fresh,
            Err(e) => {
                self.values = previous;
                return Err(e);
            }
        };
        let replaced: Vec<String> = fresh.keys().cloned().collect();
        tracing::debug!(
            "Widget {} recomputed {:?} after change to {:?}",
            self.definition.id,
            replaced,
            changed
        );
        self.outputs.extend(fresh);
        Ok(replaced)
    }

    fn recompute(&self, changed: &BTreeSet<String>) -> Result<BTreeMap<String, WidgetView>, DashboardError> {
        self.definition
            .dispatcher
            .bound_to(changed)
            .map(|(id, binding)| Ok((id.clone(), (binding.compute)(&self.values)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::ProgressBar;
    use std::sync::atomic::{AtomicUsize, Ordering};

    impl WidgetController {
        fn output(&self, id: &str) -> Option<&WidgetView> {
            self.outputs.get(id)
        }

        fn set_control(&mut self, control: &str, value: ControlValue) -> Result<Vec<String>, DashboardError> {
            self.apply([(control.to_string(), value)])
        }
    }

    fn bar(percent: i64) -> WidgetView {
        WidgetView::ProgressBar(ProgressBar {
            percent: percent as u8,
            fill_width: format!("{percent}%"),
            label: format!("{percent}%"),
            aria_valuemin: 0,
            aria_valuemax: 100,
            track_color: String::new(),
            fill_gradient: [String::new(), String::new()],
            track_height_px: 0,
            label_font_px: 0,
        })
    }

    fn counter_widget(calls: Arc<AtomicUsize>) -> Arc<WidgetDefinition> {
        let definition = WidgetDefinition::builder("counter", "Counter")
            .control("a.value", 1_i64)
            .control("b.value", 2_i64)
            .output("sum.figure", &["a.value", "b.value"], move |values| {
                calls.fetch_add(1, Ordering::SeqCst);
                let a = values.integer("a.value")?.unwrap_or(0);
                let b = values.integer("b.value")?.unwrap_or(0);
                Ok(bar(a + b))
            })
            .output("a.echo", &["a.value"], |values| {
                Ok(bar(values.integer("a.value")?.unwrap_or(0)))
            })
            .fixed_output("label", bar(7))
            .build()
            .unwrap();
        Arc::new(definition)
    }

    #[test]
    fn test_initial_outputs_computed_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let controller = WidgetController::new(counter_widget(calls.clone())).unwrap();

        assert_eq!(controller.state(), ControllerState::Idle);
        assert_eq!(controller.outputs().len(), 3);
        assert_eq!(controller.output("sum.figure"), Some(&bar(3)));
        assert_eq!(controller.output("label"), Some(&bar(7)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_change_recomputes_only_bound_outputs() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut controller = WidgetController::new(counter_widget(calls)).unwrap();

        let replaced = controller.set_control("b.value", ControlValue::Integer(10)).unwrap();
        assert_eq!(replaced, vec!["sum.figure".to_string()]);
        assert_eq!(controller.output("sum.figure"), Some(&bar(11)));
        assert_eq!(controller.output("a.echo"), Some(&bar(1)));
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[test]
    fn test_last_value_wins_and_recomputes_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut controller = WidgetController::new(counter_widget(calls.clone())).unwrap();

        controller
            .apply(vec![
                ("a.value".to_string(), ControlValue::Integer(5)),
                ("b.value".to_string(), ControlValue::Integer(5)),
                ("a.value".to_string(), ControlValue::Integer(20)),
            ])
            .unwrap();

        assert_eq!(controller.output("sum.figure"), Some(&bar(25)));
        assert_eq!(controller.output("a.echo"), Some(&bar(20)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unknown_control_is_rejected() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut controller = WidgetController::new(counter_widget(calls)).unwrap();

        let err = controller
            .set_control("c.value", ControlValue::Integer(1))
            .unwrap_err();
        assert_eq!(
            err,
            DashboardError::UnknownControl {
                widget: "counter".to_string(),
                control: "c.value".to_string(),
            }
        );
        assert_eq!(controller.output("sum.figure"), Some(&bar(3)));
    }

    #[test]
    fn test_failed_recompute_keeps_previous_outputs() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut controller = WidgetController::new(counter_widget(calls)).unwrap();

        let err = controller
            .set_control("a.value", ControlValue::Text("many".to_string()))
            .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidControlValue { .. }));
        assert_eq!(controller.state(), ControllerState::Idle);
        assert_eq!(controller.output("sum.figure"), Some(&bar(3)));
        assert_eq!(controller.output("a.echo"), Some(&bar(1)));
        assert_eq!(controller.values().integer("a.value"), Ok(Some(1)));
    }

    #[test]
    fn test_controllers_do_not_share_state() {
        let calls = Arc::new(AtomicUsize::new(0));
        let definition = counter_widget(calls);
        let mut first = WidgetController::new(definition.clone()).unwrap();
        let second = WidgetController::new(definition).unwrap();

        first.set_control("a.value", ControlValue::Integer(50)).unwrap();
        assert_eq!(first.output("a.echo"), Some(&bar(50)));
        assert_eq!(second.output("a.echo"), Some(&bar(1)));
    }

    #[test]
    fn test_builder_rejects_bad_wiring() {
        let err = WidgetDefinition::builder("w", "W")
            .control("x", 0_i64)
            .output("out", &["y"], |_| Ok(bar(0)))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::UndeclaredControl { .. }));

        let err = WidgetDefinition::builder("w", "W")
            .fixed_output("out", bar(0))
            .fixed_output("out", bar(1))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateOutput { .. }));

        let err = WidgetDefinition::builder("w", "W")
            .control("x", 0_i64)
            .control("x", 1_i64)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateControl { .. }));
    }
}

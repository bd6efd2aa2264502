// Widget registry and page composition
use crate::application::controller::WidgetDefinition;
use crate::domain::dashboard::Page;
use crate::domain::error::ConfigurationError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Widgets by unique id, in registration order.
#[derive(Debug, Clone, Default)]
pub struct WidgetRegistry {
    order: Vec<String>,
    widgets: BTreeMap<String, Arc<WidgetDefinition>>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: WidgetDefinition) -> Result<(), ConfigurationError> {
        if self.widgets.contains_key(&definition.id) {
            return Err(ConfigurationError::DuplicateWidget(definition.id));
        }
        tracing::debug!("Registered widget {}", definition.id);
        self.order.push(definition.id.clone());
        self.widgets.insert(definition.id.clone(), Arc::new(definition));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<WidgetDefinition>> {
        self.widgets.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.widgets.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<WidgetDefinition>> {
        self.order.iter().filter_map(|id| self.widgets.get(id))
    }
}

const RESERVED_ROUTES: [&str; 2] = ["/api", "/healthz"];

/// `path` is `base` itself or nested below it.
fn within(path: &str, base: &str) -> bool {
    path.strip_prefix(base)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Static assets are mounted under `static_url`, so it can be neither the
/// root nor inside a built-in route.
fn static_mount(static_url: &str) -> Result<&str, ConfigurationError> {
    let mount = static_url.trim_end_matches('/');
    if !static_url.starts_with('/') || mount.is_empty() || RESERVED_ROUTES.iter().any(|r| within(mount, r)) {
        return Err(ConfigurationError::ReservedPath(static_url.to_string()));
    }
    Ok(mount)
}

/// Pages keyed by path, every widget reference checked against the registry.
#[derive(Debug, Clone, Default)]
pub struct PageComposer {
    pages: BTreeMap<String, Page>,
}

impl PageComposer {
    /// Page paths must not shadow the API, the health check or the static mount.
    pub fn compose(
        registry: &WidgetRegistry,
        pages: Vec<Page>,
        static_url: &str,
    ) -> Result<Self, ConfigurationError> {
        let mount = static_mount(static_url)?;
        let mut composed = BTreeMap::new();
        for page in pages {
            if !page.path.starts_with('/')
                || RESERVED_ROUTES.iter().any(|r| within(&page.path, r))
                || within(&page.path, mount)
            {
                return Err(ConfigurationError::ReservedPath(page.path));
            }
            if let Some(widget) = page.widgets.iter().find(|w| !registry.contains(w)) {
                return Err(ConfigurationError::UnknownWidget {
                    page: page.path.clone(),
                    widget: widget.clone(),
                });
            }
            if composed.contains_key(&page.path) {
                return Err(ConfigurationError::DuplicatePage(page.path));
            }
            composed.insert(page.path.clone(), page);
        }
        Ok(Self { pages: composed })
    }

    pub fn page(&self, path: &str) -> Option<&Page> {
        self.pages.get(path)
    }

    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }
}

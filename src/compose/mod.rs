//! Merging user-supplied widgets with a default widget set.
//!
//! A render pass hands [`merge`] the defaults for a container, whatever the
//! user put inside it and the props the container shares with its
//! children. The result is the ordered list of widgets to render.
//!
//! Two widgets are "the same" when:
//! - they are the same component type (same `Arc`),
//! - their component types carry the same control id,
//! - they are primitive elements with the same tag, or
//! - their display names are equal, or one is a suffix of the other
//!   (`CustomPlayToggle` stands in for `PlayToggle`).
//!
//! The first three and equal names are exact matches; a suffix match is
//! only used when no exact match exists.

use log::warn;
use serde::Serialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

pub mod control_bar;
pub mod player;

pub use control_bar::ControlBarOptions;
pub use player::{PlayerComposition, PlayerOptions};

/// A widget implementation. Compared by reference.
#[derive(Debug)]
pub struct ComponentType {
    display_name: String,
    control_id: Option<String>,
}

impl ComponentType {
    pub fn new(display_name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            display_name: display_name.into(),
            control_id: None,
        })
    }

    /// A component that stands in for the widget identified by `control_id`.
    pub fn with_control_id(display_name: impl Into<String>, control_id: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            display_name: display_name.into(),
            control_id: Some(control_id.into()),
        })
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn control_id(&self) -> Option<&str> {
        self.control_id.as_deref()
    }
}

#[derive(Debug, Clone)]
pub enum ElementType {
    /// A primitive element such as `source` or `track`.
    Tag(String),
    Component(Arc<ComponentType>),
}

impl ElementType {
    /// The tag for primitive elements, the display name otherwise.
    pub fn name(&self) -> &str {
        match self {
            ElementType::Tag(tag) => tag,
            ElementType::Component(component) => component.display_name(),
        }
    }

    pub fn control_id(&self) -> Option<&str> {
        match self {
            ElementType::Tag(_) => None,
            ElementType::Component(component) => component.control_id(),
        }
    }

    pub fn is_component(&self, component: &Arc<ComponentType>) -> bool {
        matches!(self, ElementType::Component(c) if Arc::ptr_eq(c, component))
    }
}

impl PartialEq for ElementType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ElementType::Tag(a), ElementType::Tag(b)) => a == b,
            (ElementType::Component(a), ElementType::Component(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One widget to render, with its ordering key and props.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetDescriptor {
    pub element_type: ElementType,
    pub order: Option<f64>,
    pub disabled: bool,
    pub props: Map<String, Value>,
    pub children: Vec<Child>,
}

impl WidgetDescriptor {
    pub fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            order: None,
            disabled: false,
            props: Map::new(),
            children: Vec::new(),
        }
    }

    pub fn component(component: &Arc<ComponentType>) -> Self {
        Self::new(ElementType::Component(Arc::clone(component)))
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self::new(ElementType::Tag(tag.into()))
    }

    pub fn with_order(mut self, order: f64) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<Child>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn name(&self) -> &str {
        self.element_type.name()
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    pub fn flag(&self, key: &str) -> bool {
        self.props.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Sort key, `default_order` when unset.
    pub fn order_or(&self, default_order: f64) -> f64 {
        self.order.unwrap_or(default_order)
    }

    pub fn elements(&self) -> impl Iterator<Item = &WidgetDescriptor> {
        self.children.iter().filter_map(Child::as_element)
    }
}

/// Anything a user may put inside a container. Only elements take part
/// in composition.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Element(WidgetDescriptor),
    Text(String),
}

impl Child {
    pub fn as_element(&self) -> Option<&WidgetDescriptor> {
        match self {
            Child::Element(element) => Some(element),
            Child::Text(_) => None,
        }
    }
}

impl From<WidgetDescriptor> for Child {
    fn from(element: WidgetDescriptor) -> Self {
        Child::Element(element)
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(text.to_string())
    }
}

/// How two widgets were found to be the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Exact,
    Suffix,
}

/// Identity of `a` and `b`, if they are the same widget.
pub fn identity(a: &ElementType, b: &ElementType) -> Option<Identity> {
    match (a, b) {
        (ElementType::Tag(x), ElementType::Tag(y)) => (x == y).then_some(Identity::Exact),
        (ElementType::Component(x), ElementType::Component(y)) => {
            if Arc::ptr_eq(x, y) {
                return Some(Identity::Exact);
            }
            if let (Some(x_id), Some(y_id)) = (x.control_id(), y.control_id()) {
                if x_id == y_id {
                    return Some(Identity::Exact);
                }
            }
            names_match(x.display_name(), y.display_name())
        }
        _ => None,
    }
}

fn names_match(a: &str, b: &str) -> Option<Identity> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    if a == b {
        Some(Identity::Exact)
    } else if a.ends_with(b) || b.ends_with(a) {
        Some(Identity::Suffix)
    } else {
        None
    }
}

/// A widget that suffix-matched more than one default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ambiguity {
    pub widget: String,
    pub candidates: Vec<String>,
    pub chosen: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    pub widgets: Vec<WidgetDescriptor>,
    pub ambiguities: Vec<Ambiguity>,
}

impl MergeOutcome {
    pub fn names(&self) -> Vec<&str> {
        self.widgets.iter().map(WidgetDescriptor::name).collect()
    }

    pub fn find(&self, component: &Arc<ComponentType>) -> Option<&WidgetDescriptor> {
        self.widgets.iter().find(|w| w.element_type.is_component(component))
    }
}

/// Finds the default `element` stands in for: an exact match if there is
/// one, else the first suffix match.
fn matching_default<'d>(
    element: &WidgetDescriptor,
    defaults: &'d [WidgetDescriptor],
    ambiguities: &mut Vec<Ambiguity>,
) -> Option<&'d WidgetDescriptor> {
    let mut suffix_matches = Vec::new();
    for default in defaults {
        match identity(&element.element_type, &default.element_type) {
            Some(Identity::Exact) => return Some(default),
            Some(Identity::Suffix) => suffix_matches.push(default),
            None => {}
        }
    }

    let chosen = suffix_matches.first().copied()?;
    if suffix_matches.len() > 1 {
        let ambiguity = Ambiguity {
            widget: element.name().to_string(),
            candidates: suffix_matches.iter().map(|d| d.name().to_string()).collect(),
            chosen: chosen.name().to_string(),
        };
        warn!(
            "{} matches several defaults by name ({}), using {}",
            ambiguity.widget,
            ambiguity.candidates.join(", "),
            ambiguity.chosen
        );
        ambiguities.push(ambiguity);
    }
    Some(chosen)
}

/// Merges `users` into `defaults`.
///
/// - Disabled user widgets and non-element children are dropped. A disabled
///   user widget still suppresses the default it matches.
/// - Defaults not matched by any user widget follow the user widgets.
/// - Props are `shared` (without `order`), then the matched default's
///   props, then the widget's own, later ones winning.
/// - The result is stably sorted by order; unset orders use `default_order`.
pub fn merge(
    defaults: &[WidgetDescriptor],
    users: &[Child],
    shared: &Map<String, Value>,
    default_order: f64,
) -> MergeOutcome {
    let user_elements: Vec<&WidgetDescriptor> = users.iter().filter_map(Child::as_element).collect();

    let unmatched_defaults = defaults.iter().filter(|default| {
        !user_elements
            .iter()
            .any(|user| identity(&user.element_type, &default.element_type).is_some())
    });

    let candidates: Vec<&WidgetDescriptor> = user_elements
        .iter()
        .copied()
        .filter(|user| !user.disabled)
        .chain(unmatched_defaults)
        .collect();

    let mut ambiguities = Vec::new();
    let mut widgets: Vec<WidgetDescriptor> = candidates
        .into_iter()
        .map(|element| {
            let default = matching_default(element, defaults, &mut ambiguities);

            let mut props: Map<String, Value> = shared
                .iter()
                .filter(|(key, _)| key.as_str() != "order")
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            if let Some(default) = default {
                props.extend(default.props.clone());
            }
            props.extend(element.props.clone());

            WidgetDescriptor {
                element_type: element.element_type.clone(),
                order: element.order.or_else(|| default.and_then(|d| d.order)),
                disabled: false,
                props,
                children: element.children.clone(),
            }
        })
        .collect();

    widgets.sort_by(|a, b| compare_order(a, b, default_order));

    MergeOutcome { widgets, ambiguities }
}

fn compare_order(a: &WidgetDescriptor, b: &WidgetDescriptor, default_order: f64) -> Ordering {
    a.order_or(default_order).total_cmp(&b.order_or(default_order))
}

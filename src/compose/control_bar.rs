use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::time::Duration;

use super::{merge, Child, MergeOutcome, WidgetDescriptor};
use crate::widgets::catalog;

const PLAY_TOGGLE_ID: &str = "PlayToggle";

/// Control bar props that configure the bar itself and are not passed on
/// to its widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlBarOptions {
    /// Hide the bar with the rest of the controls when the user is idle
    pub auto_hide: bool,

    /// Idle delay before hiding, in milliseconds
    pub auto_hide_time: Option<u64>,

    /// Start from an empty default set
    pub disable_default_controls: bool,

    /// Render nothing at all
    pub disable_completely: bool,
}

impl Default for ControlBarOptions {
    fn default() -> Self {
        Self {
            auto_hide: true,
            auto_hide_time: None,
            disable_default_controls: false,
            disable_completely: false,
        }
    }
}

const OPTION_KEYS: [&str; 4] = ["autoHide", "autoHideTime", "disableDefaultControls", "disableCompletely"];

impl ControlBarOptions {
    /// Reads the options out of a control bar's props. Malformed values
    /// fall back to the defaults.
    pub fn from_props(props: &Map<String, Value>) -> Self {
        let relevant: Map<String, Value> = props
            .iter()
            .filter(|(key, _)| OPTION_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        match serde_json::from_value(Value::Object(relevant)) {
            Ok(options) => options,
            Err(e) => {
                warn!("Ignoring malformed control bar options: {}", e);
                Self::default()
            }
        }
    }

    pub fn auto_hide_delay(&self) -> Option<Duration> {
        self.auto_hide_time.map(Duration::from_millis)
    }
}

/// The control bar's default widgets, play toggle first.
pub fn default_children() -> Vec<WidgetDescriptor> {
    vec![
        WidgetDescriptor::component(&catalog::PLAY_TOGGLE).with_order(1.0),
        WidgetDescriptor::component(&catalog::VOLUME_MENU_BUTTON).with_order(4.0),
        WidgetDescriptor::component(&catalog::CURRENT_TIME_DISPLAY).with_order(5.1),
        WidgetDescriptor::component(&catalog::TIME_DIVIDER).with_order(5.2),
        WidgetDescriptor::component(&catalog::DURATION_DISPLAY).with_order(5.3),
        WidgetDescriptor::component(&catalog::PROGRESS_CONTROL).with_order(6.0),
        WidgetDescriptor::component(&catalog::FULLSCREEN_TOGGLE).with_order(8.0),
    ]
}

fn is_play_toggle_name(name: &str) -> bool {
    name.ends_with(PLAY_TOGGLE_ID)
}

/// Whether `element` is a play toggle, built in or user supplied.
pub fn is_play_toggle(element: &WidgetDescriptor) -> bool {
    element.element_type.is_component(&catalog::PLAY_TOGGLE)
        || element.element_type.control_id() == Some(PLAY_TOGGLE_ID)
        || is_play_toggle_name(element.name())
}

/// Key used to drop duplicates after merging. Play toggles share one key
/// whatever they are called.
fn dedup_key(element: &WidgetDescriptor) -> Option<String> {
    let name = element.name();
    let id = element
        .element_type
        .control_id()
        .or_else(|| is_play_toggle_name(name).then_some(PLAY_TOGGLE_ID));
    match (id, name) {
        (Some(id), _) => Some(format!("id:{}", id)),
        (None, "") => None,
        (None, name) => Some(format!("name:{}", name)),
    }
}

/// Composes a control bar element into its widget list.
///
/// Returns `None` when the bar is disabled completely.
pub fn compose(control_bar: &WidgetDescriptor, default_order: f64) -> Option<MergeOutcome> {
    let options = ControlBarOptions::from_props(&control_bar.props);
    let shared: Map<String, Value> = control_bar
        .props
        .iter()
        .filter(|(key, _)| !OPTION_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    compose_with(&control_bar.children, &shared, &options, default_order)
}

pub fn compose_with(
    users: &[Child],
    shared: &Map<String, Value>,
    options: &ControlBarOptions,
    default_order: f64,
) -> Option<MergeOutcome> {
    if options.disable_completely {
        return None;
    }

    let mut defaults = if options.disable_default_controls {
        Vec::new()
    } else {
        default_children()
    };

    let has_user_play_toggle = users.iter().filter_map(Child::as_element).any(is_play_toggle);
    if has_user_play_toggle {
        debug!("User supplied a play toggle, dropping the default one");
        defaults.retain(|default| !is_play_toggle(default));
    }

    let mut outcome = merge(&defaults, users, shared, default_order);

    let mut seen = HashSet::new();
    outcome.widgets.retain(|widget| match dedup_key(widget) {
        Some(key) => seen.insert(key),
        None => true,
    });

    Some(outcome)
}

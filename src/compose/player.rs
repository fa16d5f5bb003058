use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use super::control_bar::ControlBarOptions;
use super::{merge, Child, ElementType, MergeOutcome, WidgetDescriptor};
use crate::widgets::catalog;

const BIG_PLAY_BUTTON_MARKER: &str = "data-big-play-button";

/// Player props that shape its own default set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerOptions {
    /// Leave the default big play button out even if the user has none
    pub hide_default_big_play_button: bool,

    /// `left` or `center`, passed to the default big play button
    pub big_play_button_position: Option<String>,
}

/// The player's widgets for one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerComposition {
    pub outcome: MergeOutcome,
    /// `source`/`track` children routed into the video element.
    pub video_children: Vec<WidgetDescriptor>,
    /// Idle delay requested by a user-supplied control bar.
    pub controls_auto_hide: Option<Duration>,
    /// Whether idle controls hide at all. Cleared by a user-supplied
    /// control bar with `autoHide: false`.
    pub auto_hide_controls: bool,
}

impl PlayerComposition {
    pub fn widgets(&self) -> &[WidgetDescriptor] {
        &self.outcome.widgets
    }
}

/// Children that belong inside the media element rather than the player.
pub fn is_video_child(element: &WidgetDescriptor) -> bool {
    if element.flag("isVideoChild") {
        return true;
    }
    matches!(&element.element_type, ElementType::Tag(tag) if tag == "source" || tag == "track")
}

/// Searches `children` and all their descendants for a big play button.
pub fn contains_big_play_button(children: &[Child]) -> bool {
    children.iter().filter_map(Child::as_element).any(|element| {
        element.element_type.is_component(&catalog::BIG_PLAY_BUTTON)
            || matches!(&element.element_type, ElementType::Component(c) if c.display_name() == catalog::BIG_PLAY_BUTTON.display_name())
            || element.prop(BIG_PLAY_BUTTON_MARKER) == Some(&Value::Bool(true))
            || contains_big_play_button(&element.children)
    })
}

/// Options of the last user-supplied control bar, if any.
pub fn control_bar_options(children: &[Child]) -> Option<ControlBarOptions> {
    children
        .iter()
        .filter_map(Child::as_element)
        .filter(|element| element.element_type.is_component(&catalog::CONTROL_BAR))
        .last()
        .map(|element| ControlBarOptions::from_props(&element.props))
}

pub fn default_children(
    include_big_play_button: bool,
    options: &PlayerOptions,
    video_children: &[WidgetDescriptor],
) -> Vec<WidgetDescriptor> {
    let mut video = WidgetDescriptor::component(&catalog::VIDEO).with_order(0.0);
    video.children = video_children.iter().cloned().map(Child::Element).collect();

    let mut defaults = vec![
        video,
        WidgetDescriptor::component(&catalog::POSTER_IMAGE).with_order(1.0),
        WidgetDescriptor::component(&catalog::LOADING_SPINNER).with_order(2.0),
        WidgetDescriptor::component(&catalog::BEZEL).with_order(3.0),
    ];
    if include_big_play_button {
        let mut big_play = WidgetDescriptor::component(&catalog::BIG_PLAY_BUTTON).with_order(4.0);
        if let Some(position) = &options.big_play_button_position {
            big_play = big_play.with_prop("position", position.as_str());
        }
        defaults.push(big_play);
    }
    defaults.push(WidgetDescriptor::component(&catalog::CONTROL_BAR).with_order(5.0));
    defaults.push(WidgetDescriptor::component(&catalog::SHORTCUT).with_order(99.0));
    defaults
}

/// Composes the player's direct children.
pub fn compose(
    users: &[Child],
    shared: &Map<String, Value>,
    options: &PlayerOptions,
    default_order: f64,
) -> PlayerComposition {
    let (video_children, rest): (Vec<&Child>, Vec<&Child>) = users
        .iter()
        .partition(|child| child.as_element().is_some_and(is_video_child));
    let video_children: Vec<WidgetDescriptor> = video_children
        .into_iter()
        .filter_map(Child::as_element)
        .cloned()
        .collect();
    let rest: Vec<Child> = rest.into_iter().cloned().collect();

    let include_big_play_button = !options.hide_default_big_play_button && !contains_big_play_button(users);
    let defaults = default_children(include_big_play_button, options, &video_children);

    let control_bar = control_bar_options(users);
    PlayerComposition {
        outcome: merge(&defaults, &rest, shared, default_order),
        video_children,
        controls_auto_hide: control_bar.as_ref().and_then(ControlBarOptions::auto_hide_delay),
        auto_hide_controls: control_bar.map_or(true, |options| options.auto_hide),
    }
}
